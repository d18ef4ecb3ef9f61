use snafu::ensure;

use crate::crypto::block::BLOCK_SIZE;
use crate::crypto::oracle::PaddingValidator;
use crate::crypto::padding;
use crate::error::{InvalidArgumentSnafu, NoCandidateSnafu, Result};

// Recovers the full plaintext of a CBC ciphertext given nothing but the
// boolean padding-valid signal. Works last byte to first within each block:
// every probe submits the target block as a one-block message with a mutated
// copy of the preceding block standing in as its iv
pub fn recover_plaintext(
    ct: &[u8],
    iv: &[u8; BLOCK_SIZE],
    oracle: &dyn PaddingValidator,
) -> Result<Vec<u8>> {
    ensure!(
        !ct.is_empty() && ct.len() % BLOCK_SIZE == 0,
        InvalidArgumentSnafu { message: "ciphertext is not a whole number of blocks" }
    );

    let chain = iv.chunks(BLOCK_SIZE).chain(ct.chunks(BLOCK_SIZE));
    let recovered: Vec<Vec<u8>> = chain
        .zip(ct.chunks(BLOCK_SIZE))
        .map(|(prev, cur)| recover_block(prev, cur, oracle))
        .collect::<Result<_>>()?;

    padding::strip_or_fail(&recovered.concat(), BLOCK_SIZE)
}

fn recover_block(
    prev: &[u8],
    cur: &[u8],
    oracle: &dyn PaddingValidator,
) -> Result<Vec<u8>> {
    let mut mutated = [0u8; BLOCK_SIZE];
    mutated.copy_from_slice(prev);
    let mut recovered = [0u8; BLOCK_SIZE];

    for j in (0..BLOCK_SIZE).rev() {
        let pad_val = (BLOCK_SIZE - j) as u8;
        let mut found = None;

        for t in 0..=u8::MAX {
            mutated[j] = t;
            if !oracle.is_valid_padding(cur, &mutated) {
                continue;
            }
            // At the final byte a probe can hit coincidental 02 02 (or
            // longer) padding that depends on bytes we have not forged yet.
            // Perturbing the second-to-last byte breaks any such padding
            // while leaving genuine 01 padding valid
            if j == BLOCK_SIZE - 1 {
                mutated[j - 1] ^= 0xff;
                let still_valid = oracle.is_valid_padding(cur, &mutated);
                mutated[j - 1] ^= 0xff;
                if !still_valid {
                    continue;
                }
            }
            found = Some(t);
            break;
        }

        let t = match found {
            Some(t) => t,
            None => return NoCandidateSnafu.fail(),
        };

        // The forged plaintext byte here is pad_val, so the real one is
        // prev[j] XOR pad_val XOR t
        recovered[j] = prev[j] ^ pad_val ^ t;

        // Re-aim every locked byte from producing pad_val to pad_val + 1
        for k in j..BLOCK_SIZE {
            mutated[k] ^= pad_val ^ (pad_val + 1);
        }
    }

    Ok(recovered.to_vec())
}
