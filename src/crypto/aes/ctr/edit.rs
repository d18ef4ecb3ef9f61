use snafu::prelude::*;

use crate::crypto::block::BLOCK_SIZE;
use crate::crypto::oracle::Editor;
use crate::crypto::xor::fixed_xor;
use crate::error::{Result, UnexpectedOracleSnafu};

// The keystream byte at position p satisfies C[p] XOR P[p] = C'[p] XOR P'[p]
// for any edit, so overwriting a block with known filler hands us that
// block's plaintext: P_i = C_i XOR filler XOR C'_i. Blocks are independent,
// so order does not matter
pub fn recover_plaintext(ct: &[u8], oracle: &dyn Editor) -> Result<Vec<u8>> {
    const FILLER: [u8; BLOCK_SIZE] = [b'A'; BLOCK_SIZE];

    let mut recovered = Vec::with_capacity(ct.len());
    for (i, chunk) in ct.chunks(BLOCK_SIZE).enumerate() {
        // The final block may be partial; the filler is truncated to the true
        // plaintext length so the edit stays length-preserving
        let filler = &FILLER[..chunk.len()];
        let edited = oracle.edit(ct, i * BLOCK_SIZE, filler)?;
        ensure!(edited.len() == ct.len(), UnexpectedOracleSnafu {
            message: "edit changed the ciphertext length",
        });
        let edited_chunk = &edited[i * BLOCK_SIZE..i * BLOCK_SIZE + chunk.len()];
        recovered.extend(fixed_xor(&fixed_xor(chunk, filler), edited_chunk));
    }
    Ok(recovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::oracle::{CtrEditOracle, Encryptor};

    #[test]
    fn test_recover_plaintext_through_edit_alone() {
        let plaintext = b"I'm back and I'm ringin' the bell \nA rockin' on the mike while the fly girls yell \n";
        assert_ne!(0, plaintext.len() % BLOCK_SIZE);

        let oracle = CtrEditOracle::new();
        let ct = oracle.encrypt(plaintext).unwrap();

        let recovered = recover_plaintext(&ct, &oracle).unwrap();
        assert_eq!(plaintext.to_vec(), recovered);
    }

    #[test]
    fn test_recover_block_aligned_plaintext() {
        let plaintext = vec![0x37u8; 4 * BLOCK_SIZE];
        let oracle = CtrEditOracle::new();
        let ct = oracle.encrypt(&plaintext).unwrap();
        assert_eq!(plaintext, recover_plaintext(&ct, &oracle).unwrap());
    }
}
