use concat_arrays::concat_arrays;
use itertools::Itertools;

use crate::crypto::block::{encrypt_block, BLOCK_SIZE};
use crate::crypto::xor::fixed_xor;
use crate::error::Result;

pub mod edit;
pub mod bitflip;

// Keystream block i is E_k(nonce || i), an 8-byte little-endian nonce
// followed by an 8-byte little-endian counter. Encryption and decryption are
// the same XOR; the final partial block truncates the keystream, so the
// ciphertext length always equals the plaintext length
pub fn aes_ctr(buf: &[u8], key: &[u8], nonce: u64) -> Result<Vec<u8>> {
    itertools::process_results(
        buf.chunks(BLOCK_SIZE)
            .enumerate()
            .map(|(counter, chunk)| {
                let ctr_block: [u8; BLOCK_SIZE] =
                    concat_arrays!(nonce.to_le_bytes(), (counter as u64).to_le_bytes());
                let keystream = encrypt_block(key, &ctr_block)?;
                Ok(fixed_xor(chunk, &keystream[..chunk.len()]))
            }),
        |blocks| blocks.concat(),
    )
}
