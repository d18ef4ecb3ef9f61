use snafu::ensure;

use crate::crypto::block::BLOCK_SIZE;
use crate::error::{InvalidArgumentSnafu, Result};

// Flipping a bit in ciphertext block b-1 flips the same bit of plaintext
// block b after decryption, at the price of scrambling block b-1's own
// plaintext. XORing in the delta between the known plaintext and the payload
// therefore plants the payload without the key. The payload must sit inside
// a single block, and that block needs a ciphertext predecessor
pub fn inject_payload(
    ct: &[u8],
    known_pt: &[u8],
    offset: usize,
    payload: &[u8],
) -> Result<Vec<u8>> {
    ensure!(
        offset >= BLOCK_SIZE,
        InvalidArgumentSnafu { message: "the payload block needs a ciphertext block before it" }
    );
    ensure!(
        offset + payload.len() <= known_pt.len(),
        InvalidArgumentSnafu { message: "payload runs past the known plaintext" }
    );
    ensure!(
        offset % BLOCK_SIZE + payload.len() <= BLOCK_SIZE,
        InvalidArgumentSnafu { message: "payload crosses a block boundary" }
    );

    let mut forged = ct.to_vec();
    for (i, (&want, &have)) in payload.iter().zip(&known_pt[offset..]).enumerate() {
        forged[offset - BLOCK_SIZE + i] ^= want ^ have;
    }
    Ok(forged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::oracle::{
        CbcUserDataOracle, ContentChecker, Encryptor, USER_DATA_PREFIX,
    };
    use crate::error::Error;

    #[test]
    fn test_inject_admin_token() {
        let oracle = CbcUserDataOracle::new();
        let user_data = vec![b'A'; BLOCK_SIZE];
        let ct = oracle.encrypt(&user_data).unwrap();
        assert!(!oracle.contains_token(&ct, b";admin=true;").unwrap());

        // The oracle swallows ';' and '=' from caller data, but the attacker
        // still knows the exact plaintext layout: prefix, filler, suffix
        let known_pt = [USER_DATA_PREFIX, user_data.as_slice()].concat();
        let offset = USER_DATA_PREFIX.len();
        assert_eq!(0, offset % BLOCK_SIZE);

        let forged = inject_payload(&ct, &known_pt, offset, b";admin=true;").unwrap();
        assert!(oracle.contains_token(&forged, b";admin=true;").unwrap());
    }

    // The first plaintext block has no ciphertext predecessor to flip
    #[test]
    fn test_inject_rejects_payload_in_the_first_block() {
        let ct = vec![0u8; 3 * BLOCK_SIZE];
        let known_pt = vec![b'A'; 3 * BLOCK_SIZE];
        assert!(matches!(
            inject_payload(&ct, &known_pt, 0, b";admin=true;"),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_inject_rejects_payload_crossing_a_block_boundary() {
        let ct = vec![0u8; 3 * BLOCK_SIZE];
        let known_pt = vec![b'A'; 3 * BLOCK_SIZE];
        assert!(matches!(
            inject_payload(&ct, &known_pt, BLOCK_SIZE + 10, b";admin=true;"),
            Err(Error::InvalidArgument { .. })
        ));
    }
}
