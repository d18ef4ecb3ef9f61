use crate::crypto::block::{decrypt_block, encrypt_block, BLOCK_SIZE};
use crate::crypto::padding;
use crate::error::Result;

pub mod byte_by_byte;
pub mod cut_and_paste;

pub fn aes_ecb_encrypt(buf: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    padding::pad(buf, BLOCK_SIZE)
        .chunks(BLOCK_SIZE)
        .map(|block| encrypt_block(key, block))
        .collect::<Result<Vec<Vec<u8>>>>()
        .map(|blocks| blocks.concat())
}

pub fn aes_ecb_decrypt(buf: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let decrypted = buf.chunks(BLOCK_SIZE)
        .map(|block| decrypt_block(key, block))
        .collect::<Result<Vec<Vec<u8>>>>()?
        .concat();
    padding::strip_or_fail(&decrypted, BLOCK_SIZE)
}

#[test]
fn test_aes_ecb_encrypt_and_decrypt() {
    let plaintext = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let key = b"YELLOW SUBMARINE";
    let ciphertext = aes_ecb_encrypt(plaintext, key).unwrap();
    assert_eq!(0, ciphertext.len() % BLOCK_SIZE);
    let result = aes_ecb_decrypt(&ciphertext, key).unwrap();
    assert_eq!(plaintext.to_vec(), result);
}

// The structural leak every ECB attack builds on: equal plaintext blocks
// produce equal ciphertext blocks under the same key
#[test]
fn test_identical_blocks_encrypt_identically() {
    let plaintext = [b"ABCDEFGHIJKLMNOP".to_vec(), b"ABCDEFGHIJKLMNOP".to_vec()].concat();
    let key = b"YELLOW SUBMARINE";
    let ciphertext = aes_ecb_encrypt(&plaintext, key).unwrap();
    let blocks: Vec<&[u8]> = ciphertext.chunks(BLOCK_SIZE).collect();
    assert_eq!(blocks[0], blocks[1]);
}

#[test]
fn test_ciphertext_grows_by_at_least_one_pad_byte() {
    let key = b"YELLOW SUBMARINE";
    for len in [0, 1, 15, 16, 17, 31, 32] {
        let ciphertext = aes_ecb_encrypt(&vec![b'A'; len], key).unwrap();
        assert!(ciphertext.len() > len);
        assert!(ciphertext.len() <= len + BLOCK_SIZE);
    }
}
