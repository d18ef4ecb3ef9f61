use openssl::symm::{Cipher, Crypter, Mode};
use snafu::prelude::*;

use crate::error::{BackendSnafu, PrimitiveLengthSnafu, Result};

pub const BLOCK_SIZE: usize = 16;

// The raw single-block primitive the modes are built from. Deterministic and
// stateless: chaining, counters and padding all live a layer up.
pub fn encrypt_block(key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
    transform_block(key, block, Mode::Encrypt)
}

pub fn decrypt_block(key: &[u8], block: &[u8]) -> Result<Vec<u8>> {
    transform_block(key, block, Mode::Decrypt)
}

fn transform_block(key: &[u8], block: &[u8], mode: Mode) -> Result<Vec<u8>> {
    ensure!(key.len() == BLOCK_SIZE, PrimitiveLengthSnafu {
        expected: BLOCK_SIZE,
        actual: key.len(),
    });
    ensure!(block.len() == BLOCK_SIZE, PrimitiveLengthSnafu {
        expected: BLOCK_SIZE,
        actual: block.len(),
    });

    let mut crypter = Crypter::new(Cipher::aes_128_ecb(), mode, key, None)
        .context(BackendSnafu)?;
    crypter.pad(false);
    let mut out = vec![0u8; 2 * BLOCK_SIZE];
    let mut written = crypter.update(block, &mut out).context(BackendSnafu)?;
    written += crypter.finalize(&mut out[written..]).context(BackendSnafu)?;
    out.truncate(written);
    Ok(out)
}

#[test]
fn test_block_round_trip() {
    let key = b"YELLOW SUBMARINE";
    let block = b"ABCDEFGHIJKLMNOP";
    let ct = encrypt_block(key, block).unwrap();
    assert_eq!(BLOCK_SIZE, ct.len());
    let pt = decrypt_block(key, &ct).unwrap();
    assert_eq!(block.to_vec(), pt);
}

#[test]
fn test_block_is_deterministic() {
    let key = b"YELLOW SUBMARINE";
    let block = b"ABCDEFGHIJKLMNOP";
    let ct1 = encrypt_block(key, block).unwrap();
    let ct2 = encrypt_block(key, block).unwrap();
    assert_eq!(ct1, ct2);
}

// FIPS-197 appendix C.1
#[test]
fn test_block_fixed_vector() {
    let key = hex!("000102030405060708090a0b0c0d0e0f");
    let block = hex!("00112233445566778899aabbccddeeff");
    let ct = encrypt_block(&key, &block).unwrap();
    assert_eq!("69c4e0d86a7b0430d8cdb78070b4c55a", hex::encode(&ct));
}

#[test]
fn test_block_rejects_bad_lengths() {
    use crate::error::Error;

    let key = b"YELLOW SUBMARINE";
    let result = encrypt_block(key, b"short");
    assert!(matches!(result, Err(Error::PrimitiveLength { expected: 16, actual: 5 })));
    let result_2 = decrypt_block(b"short", &[0u8; 16]);
    assert!(matches!(result_2, Err(Error::PrimitiveLength { .. })));
}
