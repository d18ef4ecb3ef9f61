use crate::crypto::aes::determine_block_size;
use crate::crypto::common::{repeating_block, round_up_to_nearest_multiple};
use crate::crypto::oracle::Encryptor;
use crate::crypto::padding;
use crate::error::{Result, UnexpectedOracleSnafu};

// Forges a role=admin cookie from an oracle that only ever issues role=user.
// ECB encrypts equal blocks equally, so a ciphertext block harvested from one
// query can be stapled onto another: plant "admin" plus its padding
// block-aligned inside the email to harvest that block, then pick an email
// length that makes "...&role=" end on a block boundary and swap the final
// block out. Assumes role is the last encoded field
pub fn forge_admin_profile(oracle: &dyn Encryptor) -> Result<Vec<u8>> {
    let block_size = determine_block_size(oracle)?;

    // Harvest: the crafted block goes in twice, so it shows up as a repeated
    // ciphertext block no matter what surrounds it
    let target_block = padding::pad(b"admin", block_size);
    let harvest_email = [
        vec![b'A'; block_size - b"email=".len()],
        target_block.clone(),
        target_block,
    ]
    .concat();
    let encrypted = oracle.encrypt(&harvest_email)?;
    let admin_block = match repeating_block(&encrypted, block_size) {
        Some((_, block)) => block,
        None => {
            return UnexpectedOracleSnafu {
                message: "no repeated block appeared while harvesting",
            }
            .fail()
        }
    };

    // Cut: size the email so the encoded profile fills whole blocks up
    // through "role=", leaving "user" plus padding alone in the final block
    let fixed_len = b"email=&uid=10&role=".len();
    let email_len = round_up_to_nearest_multiple(fixed_len, block_size) - fixed_len;
    let encrypted = oracle.encrypt(&vec![b'A'; email_len])?;

    // Paste
    Ok([&encrypted[..encrypted.len() - block_size], admin_block.as_slice()].concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::oracle::ProfileOracle;

    #[test]
    fn test_forge_admin_profile() {
        let oracle = ProfileOracle::new();
        let honest = oracle.encrypt(b"attacker@evil.com").unwrap();
        assert_eq!(b"user".to_vec(), oracle.role_of(&honest).unwrap());

        let forged = forge_admin_profile(&oracle).unwrap();
        assert_eq!(b"admin".to_vec(), oracle.role_of(&forged).unwrap());
    }
}
