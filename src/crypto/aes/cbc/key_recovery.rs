use snafu::prelude::*;

use crate::crypto::block::BLOCK_SIZE;
use crate::crypto::oracle::{Encryptor, ErrorRevealingDecryptor};
use crate::crypto::xor::fixed_xor;
use crate::error::{Error, Result, UnexpectedOracleSnafu};

// When an oracle reuses its key as the CBC iv, the forged message
// C_1 || 0^16 || C_1 decrypts so that P'_1 = D(C_1) XOR key and
// P'_3 = D(C_1) XOR 0, hence P'_1 XOR P'_3 = key. The zero block decrypts to
// effectively random bytes, so the ASCII compliance check fires and its error
// leaks the whole buffer we need
pub fn recover_key<O>(oracle: &O) -> Result<[u8; BLOCK_SIZE]>
where
    O: Encryptor + ErrorRevealingDecryptor,
{
    let probe = [
        vec![b'A'; BLOCK_SIZE],
        vec![b'B'; BLOCK_SIZE],
        vec![b'C'; BLOCK_SIZE],
    ].concat();
    let ct = oracle.encrypt(&probe)?;
    ensure!(ct.len() >= 3 * BLOCK_SIZE, UnexpectedOracleSnafu {
        message: "ciphertext shorter than the three-block probe",
    });

    let c1 = &ct[..BLOCK_SIZE];
    let zero_block = [0u8; BLOCK_SIZE];
    let forged = [c1, zero_block.as_slice(), c1].concat();

    match oracle.decrypt(&forged) {
        Err(Error::AsciiCompliance { plaintext }) => {
            ensure!(plaintext.len() >= 3 * BLOCK_SIZE, UnexpectedOracleSnafu {
                message: "leaked plaintext shorter than the forged message",
            });
            let mut key = [0u8; BLOCK_SIZE];
            key.copy_from_slice(&fixed_xor(
                &plaintext[..BLOCK_SIZE],
                &plaintext[2 * BLOCK_SIZE..3 * BLOCK_SIZE],
            ));
            Ok(key)
        }
        Ok(_) => UnexpectedOracleSnafu {
            message: "forced decryption succeeded without leaking plaintext",
        }.fail(),
        Err(e) => Err(e),
    }
}
