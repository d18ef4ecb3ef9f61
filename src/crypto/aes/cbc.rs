use crate::crypto::block::{decrypt_block, encrypt_block, BLOCK_SIZE};
use crate::crypto::padding;
use crate::crypto::xor::fixed_xor;
use crate::error::Result;

pub mod padding_oracle;
pub mod bitflip;
pub mod key_recovery;

// C_i = E_k(P_i XOR C_{i-1}) with C_0 = iv; the iv is not part of the output
pub fn aes_cbc_encrypt(buf: &[u8], key: &[u8], iv: &[u8; BLOCK_SIZE]) -> Result<Vec<u8>> {
    let padded = padding::pad(buf, BLOCK_SIZE);
    let mut out = Vec::with_capacity(padded.len());
    let mut chain = iv.to_vec();
    for block in padded.chunks(BLOCK_SIZE) {
        let encrypted = encrypt_block(key, &fixed_xor(block, &chain))?;
        chain = encrypted.clone();
        out.extend(encrypted);
    }
    Ok(out)
}

// Decrypts without touching the padding; the oracles need to inspect the raw
// padded buffer before deciding what to reveal
pub fn aes_cbc_decrypt_raw(buf: &[u8], key: &[u8], iv: &[u8; BLOCK_SIZE]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(buf.len());
    let mut chain: &[u8] = iv;
    for block in buf.chunks(BLOCK_SIZE) {
        let decrypted = decrypt_block(key, block)?;
        out.extend(fixed_xor(&decrypted, chain));
        chain = block;
    }
    Ok(out)
}

pub fn aes_cbc_decrypt(buf: &[u8], key: &[u8], iv: &[u8; BLOCK_SIZE]) -> Result<Vec<u8>> {
    let decrypted = aes_cbc_decrypt_raw(buf, key, iv)?;
    padding::strip_or_fail(&decrypted, BLOCK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::common::generate_random_bytes;

    #[test]
    fn test_aes_cbc_encrypt_and_decrypt() {
        let plaintext = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let key = b"YELLOW SUBMARINE";
        let iv = b"yellow submarine";
        let ciphertext = aes_cbc_encrypt(plaintext, key, iv).unwrap();
        assert_eq!(0, ciphertext.len() % BLOCK_SIZE);
        let result = aes_cbc_decrypt(&ciphertext, key, iv).unwrap();
        assert_eq!(plaintext.to_vec(), result);
    }

    #[test]
    fn test_aes_cbc_round_trip_random_keys() {
        for len in [0, 1, 15, 16, 17, 47, 48] {
            let key: [u8; 16] = generate_random_bytes();
            let iv: [u8; 16] = generate_random_bytes();
            let plaintext: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let ciphertext = aes_cbc_encrypt(&plaintext, &key, &iv).unwrap();
            let result = aes_cbc_decrypt(&ciphertext, &key, &iv).unwrap();
            assert_eq!(plaintext, result);
        }
    }

    // Chaining means equal plaintext blocks do not repeat in the ciphertext
    #[test]
    fn test_identical_blocks_chain_differently() {
        let plaintext = [b"ABCDEFGHIJKLMNOP".to_vec(), b"ABCDEFGHIJKLMNOP".to_vec()].concat();
        let key: [u8; 16] = generate_random_bytes();
        let iv: [u8; 16] = generate_random_bytes();
        let ciphertext = aes_cbc_encrypt(&plaintext, &key, &iv).unwrap();
        assert_ne!(ciphertext[0..16], ciphertext[16..32]);
    }
}
