use rand::Rng;
use snafu::ensure;

use crate::crypto::aes::cbc::{aes_cbc_decrypt, aes_cbc_decrypt_raw, aes_cbc_encrypt};
use crate::crypto::aes::ctr::aes_ctr;
use crate::crypto::aes::ecb::{aes_ecb_decrypt, aes_ecb_encrypt};
use crate::crypto::block::BLOCK_SIZE;
use crate::crypto::common::generate_random_bytes;
use crate::crypto::padding;
use crate::error::{
    AsciiComplianceSnafu, InvalidArgumentSnafu, Result, UnexpectedOracleSnafu,
};

// Each capability is the entire surface an attack may touch. The session
// oracles own their key material in private fields and answer queries through
// `&self`, so concurrent probes from one attack run cannot observe or corrupt
// the secret state.

pub trait Encryptor: Sync {
    fn encrypt(&self, pt: &[u8]) -> Result<Vec<u8>>;
}

pub trait PaddingValidator: Sync {
    fn is_valid_padding(&self, ct: &[u8], iv: &[u8; BLOCK_SIZE]) -> bool;
}

pub trait Editor: Sync {
    fn edit(&self, ct: &[u8], offset: usize, newtext: &[u8]) -> Result<Vec<u8>>;
}

pub trait ContentChecker: Sync {
    fn contains_token(&self, ct: &[u8], token: &[u8]) -> Result<bool>;
}

pub trait ErrorRevealingDecryptor: Sync {
    fn decrypt(&self, ct: &[u8]) -> Result<Vec<u8>>;
}

// ECB oracle computing E_k(prefix || input || suffix). The suffix is the
// secret the byte-at-a-time attack recovers; the prefix models a random,
// fixed-for-the-session amount of attacker-invisible framing
pub struct EcbSuffixOracle {
    key: [u8; BLOCK_SIZE],
    prefix: Vec<u8>,
    suffix: Vec<u8>,
}

impl EcbSuffixOracle {
    pub fn new(suffix: Vec<u8>) -> Self {
        Self {
            key: generate_random_bytes(),
            prefix: Vec::new(),
            suffix,
        }
    }

    pub fn with_random_prefix(suffix: Vec<u8>) -> Self {
        let prefix_len = rand::thread_rng().gen_range(0..=255);
        let prefix: [u8; 255] = generate_random_bytes();
        Self {
            key: generate_random_bytes(),
            prefix: prefix[..prefix_len].to_vec(),
            suffix,
        }
    }
}

impl Encryptor for EcbSuffixOracle {
    fn encrypt(&self, pt: &[u8]) -> Result<Vec<u8>> {
        let joined = [self.prefix.as_slice(), pt, self.suffix.as_slice()].concat();
        aes_ecb_encrypt(&joined, &self.key)
    }
}

// CBC oracle revealing a single bit per query: whether the decrypted buffer
// carries valid PKCS#7 padding. Structural failures collapse into `false`;
// nothing else escapes
pub struct CbcPaddingOracle {
    key: [u8; BLOCK_SIZE],
    iv: [u8; BLOCK_SIZE],
}

impl CbcPaddingOracle {
    pub fn new() -> Self {
        Self {
            key: generate_random_bytes(),
            iv: generate_random_bytes(),
        }
    }

    pub fn encrypt_message(&self, pt: &[u8]) -> Result<(Vec<u8>, [u8; BLOCK_SIZE])> {
        let ct = aes_cbc_encrypt(pt, &self.key, &self.iv)?;
        Ok((ct, self.iv))
    }
}

impl Default for CbcPaddingOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Encryptor for CbcPaddingOracle {
    fn encrypt(&self, pt: &[u8]) -> Result<Vec<u8>> {
        aes_cbc_encrypt(pt, &self.key, &self.iv)
    }
}

impl PaddingValidator for CbcPaddingOracle {
    fn is_valid_padding(&self, ct: &[u8], iv: &[u8; BLOCK_SIZE]) -> bool {
        aes_cbc_decrypt_raw(ct, &self.key, iv)
            .map(|pt| padding::is_valid(&pt, BLOCK_SIZE))
            .unwrap_or(false)
    }
}

// CTR oracle exposing random-access re-encryption. Each edit is defined
// against the plaintext underlying the ciphertext argument, never against
// running state: decrypt, splice, re-encrypt under the same key and nonce
pub struct CtrEditOracle {
    key: [u8; BLOCK_SIZE],
    nonce: u64,
}

impl CtrEditOracle {
    pub fn new() -> Self {
        Self {
            key: generate_random_bytes(),
            nonce: u64::from_le_bytes(generate_random_bytes()),
        }
    }
}

impl Default for CtrEditOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Encryptor for CtrEditOracle {
    fn encrypt(&self, pt: &[u8]) -> Result<Vec<u8>> {
        aes_ctr(pt, &self.key, self.nonce)
    }
}

impl Editor for CtrEditOracle {
    fn edit(&self, ct: &[u8], offset: usize, newtext: &[u8]) -> Result<Vec<u8>> {
        ensure!(
            offset <= ct.len(),
            InvalidArgumentSnafu { message: "edit offset past the end of the ciphertext" }
        );
        let mut pt = aes_ctr(ct, &self.key, self.nonce)?;
        // Length-preserving splice: replacements running past the end are
        // truncated at the original plaintext length
        let end = usize::min(offset + newtext.len(), pt.len());
        pt[offset..end].copy_from_slice(&newtext[..end - offset]);
        aes_ctr(&pt, &self.key, self.nonce)
    }
}

pub const USER_DATA_PREFIX: &[u8] = b"comment1=cooking%20MCs;userdata=";
pub const USER_DATA_SUFFIX: &[u8] = b";comment2=%20like%20a%20pound%20of%20bacon";

// Metacharacters are dropped rather than escaped, so no caller input can
// spell a delimited token directly
fn sanitize_user_data(data: &[u8]) -> Vec<u8> {
    data.iter()
        .copied()
        .filter(|&b| b != b';' && b != b'=')
        .collect()
}

pub struct CbcUserDataOracle {
    key: [u8; BLOCK_SIZE],
    iv: [u8; BLOCK_SIZE],
}

impl CbcUserDataOracle {
    pub fn new() -> Self {
        Self {
            key: generate_random_bytes(),
            iv: generate_random_bytes(),
        }
    }
}

impl Default for CbcUserDataOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Encryptor for CbcUserDataOracle {
    fn encrypt(&self, pt: &[u8]) -> Result<Vec<u8>> {
        let data = sanitize_user_data(pt);
        let joined = [USER_DATA_PREFIX, data.as_slice(), USER_DATA_SUFFIX].concat();
        aes_cbc_encrypt(&joined, &self.key, &self.iv)
    }
}

impl ContentChecker for CbcUserDataOracle {
    fn contains_token(&self, ct: &[u8], token: &[u8]) -> Result<bool> {
        let pt = aes_cbc_decrypt(ct, &self.key, &self.iv)?;
        Ok(contains_subslice(&pt, token))
    }
}

pub struct CtrUserDataOracle {
    key: [u8; BLOCK_SIZE],
    nonce: u64,
}

impl CtrUserDataOracle {
    pub fn new() -> Self {
        Self {
            key: generate_random_bytes(),
            nonce: u64::from_le_bytes(generate_random_bytes()),
        }
    }
}

impl Default for CtrUserDataOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Encryptor for CtrUserDataOracle {
    fn encrypt(&self, pt: &[u8]) -> Result<Vec<u8>> {
        let data = sanitize_user_data(pt);
        let joined = [USER_DATA_PREFIX, data.as_slice(), USER_DATA_SUFFIX].concat();
        aes_ctr(&joined, &self.key, self.nonce)
    }
}

impl ContentChecker for CtrUserDataOracle {
    fn contains_token(&self, ct: &[u8], token: &[u8]) -> Result<bool> {
        let pt = aes_ctr(ct, &self.key, self.nonce)?;
        Ok(contains_subslice(&pt, token))
    }
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

// ECB-encrypted profile cookies in k=v form. The caller controls only the
// email field, with '=' and '&' dropped so no input can name a field
// directly; uid and role are fixed server-side. `role_of` models the server
// consuming a presented cookie
pub struct ProfileOracle {
    key: [u8; BLOCK_SIZE],
}

impl ProfileOracle {
    pub fn new() -> Self {
        Self { key: generate_random_bytes() }
    }

    pub fn role_of(&self, ct: &[u8]) -> Result<Vec<u8>> {
        let pt = aes_ecb_decrypt(ct, &self.key)?;
        for pair in pt.split(|&b| b == b'&') {
            let mut kv = pair.splitn(2, |&b| b == b'=');
            if kv.next() == Some(b"role".as_slice()) {
                if let Some(value) = kv.next() {
                    return Ok(value.to_vec());
                }
            }
        }
        UnexpectedOracleSnafu { message: "decrypted profile has no role field" }.fail()
    }
}

impl Default for ProfileOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Encryptor for ProfileOracle {
    fn encrypt(&self, email: &[u8]) -> Result<Vec<u8>> {
        let safe: Vec<u8> = email
            .iter()
            .copied()
            .filter(|&b| b != b'=' && b != b'&')
            .collect();
        let encoded =
            [b"email=".as_slice(), safe.as_slice(), b"&uid=10&role=user".as_slice()].concat();
        aes_ecb_encrypt(&encoded, &self.key)
    }
}

// CBC oracle misconfigured with iv = key. Decryption insists on printable
// ASCII plaintext and, on failure, reports the full decrypted buffer in the
// error. That leak is the modeled information-disclosure bug. High-ASCII
// bytes are rejected before the padding check so a forged message with
// garbage padding still leaks; the printable check has to wait until after
// the strip because PKCS#7 pad bytes are themselves non-printable
pub struct KeyAsIvOracle {
    key: [u8; BLOCK_SIZE],
}

impl KeyAsIvOracle {
    pub fn new() -> Self {
        Self { key: generate_random_bytes() }
    }
}

impl Default for KeyAsIvOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Encryptor for KeyAsIvOracle {
    fn encrypt(&self, pt: &[u8]) -> Result<Vec<u8>> {
        aes_cbc_encrypt(pt, &self.key, &self.key)
    }
}

impl ErrorRevealingDecryptor for KeyAsIvOracle {
    fn decrypt(&self, ct: &[u8]) -> Result<Vec<u8>> {
        let pt = aes_cbc_decrypt_raw(ct, &self.key, &self.key)?;
        if pt.iter().any(|b| !b.is_ascii()) {
            return AsciiComplianceSnafu { plaintext: pt }.fail();
        }
        let stripped = padding::strip_or_fail(&pt, BLOCK_SIZE)?;
        if stripped.iter().any(|&b| !is_printable_ascii(b)) {
            return AsciiComplianceSnafu { plaintext: pt }.fail();
        }
        Ok(stripped)
    }
}

fn is_printable_ascii(b: u8) -> bool {
    (0x20..=0x7e).contains(&b) || b == b'\n' || b == b'\t'
}
