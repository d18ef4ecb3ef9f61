use snafu::ensure;

use crate::error::{InvalidArgumentSnafu, Result};

// CTR keystream bytes line up one-to-one with plaintext bytes, so
// C XOR P = C' XOR P' holds per byte and the forgery is a direct XOR at the
// target range. No neighbouring block gets scrambled, unlike the CBC variant
pub fn inject_payload(
    ct: &[u8],
    known_pt: &[u8],
    offset: usize,
    payload: &[u8],
) -> Result<Vec<u8>> {
    ensure!(
        known_pt.len() <= ct.len(),
        InvalidArgumentSnafu { message: "known plaintext runs past the ciphertext" }
    );
    ensure!(
        offset + payload.len() <= known_pt.len(),
        InvalidArgumentSnafu { message: "payload runs past the known plaintext" }
    );

    let mut forged = ct.to_vec();
    for (i, (&want, &have)) in payload.iter().zip(&known_pt[offset..]).enumerate() {
        forged[offset + i] ^= want ^ have;
    }
    Ok(forged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::oracle::{
        CtrUserDataOracle, ContentChecker, Encryptor, USER_DATA_PREFIX,
    };
    use crate::error::Error;

    #[test]
    fn test_inject_admin_token() {
        let oracle = CtrUserDataOracle::new();
        let user_data = b"just some filler".to_vec();
        let ct = oracle.encrypt(&user_data).unwrap();
        assert!(!oracle.contains_token(&ct, b";admin=true;").unwrap());

        let known_pt = [USER_DATA_PREFIX, user_data.as_slice()].concat();
        let offset = USER_DATA_PREFIX.len();

        let forged = inject_payload(&ct, &known_pt, offset, b";admin=true;").unwrap();
        assert!(oracle.contains_token(&forged, b";admin=true;").unwrap());
    }

    // A CTR edit need not respect block boundaries
    #[test]
    fn test_inject_straddling_a_block_boundary() {
        let oracle = CtrUserDataOracle::new();
        let user_data = vec![b'A'; 24];
        let ct = oracle.encrypt(&user_data).unwrap();

        let known_pt = [USER_DATA_PREFIX, user_data.as_slice()].concat();
        let offset = USER_DATA_PREFIX.len() + 10;

        let forged = inject_payload(&ct, &known_pt, offset, b";admin=true;").unwrap();
        assert!(oracle.contains_token(&forged, b";admin=true;").unwrap());
    }

    #[test]
    fn test_inject_rejects_payload_past_known_plaintext() {
        let ct = vec![0u8; 32];
        let known_pt = vec![b'A'; 32];
        assert!(matches!(
            inject_payload(&ct, &known_pt, 24, b";admin=true;"),
            Err(Error::InvalidArgument { .. })
        ));
    }
}
