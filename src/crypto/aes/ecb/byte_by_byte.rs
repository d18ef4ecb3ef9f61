use crate::crypto::aes::determine_block_size;
use crate::crypto::common::adjacent_repeated_block;
use crate::crypto::oracle::Encryptor;
use crate::error::{
    AmbiguousCandidateSnafu, NoCandidateSnafu, Result, UnexpectedOracleSnafu,
};

// Filler needed to push the controlled region onto a block boundary, and the
// ciphertext offset where that region begins
struct Alignment {
    pad_len: usize,
    msg_offset: usize,
}

// Grow a filler run until two adjacent ciphertext blocks repeat. The repeat
// can only come from two block-aligned copies of our filler, so the filler
// length that first produces it absorbs whatever fixed prefix the oracle
// prepends, and the index after the pair is the aligned start of the region
// we control
fn find_alignment(oracle: &dyn Encryptor, block_size: usize) -> Result<Alignment> {
    for pad_len in 0..=3 * block_size {
        let encrypted = oracle.encrypt(&vec![b'A'; pad_len])?;
        if let Some(msg_offset) = adjacent_repeated_block(&encrypted, block_size) {
            return Ok(Alignment { pad_len, msg_offset });
        }
    }
    UnexpectedOracleSnafu {
        message: "no repeated block pair appeared while aligning the prefix",
    }.fail()
}

// From the aligned position, keep adding filler until the ciphertext length
// jumps. The jump happens once the secret's padding is squeezed out, which
// pins the exact unpadded suffix length
fn find_suffix_len(
    oracle: &dyn Encryptor,
    block_size: usize,
    align: &Alignment,
) -> Result<usize> {
    let padded_len = oracle.encrypt(&vec![b'A'; align.pad_len])?.len();
    for i in 1..=block_size {
        let len = oracle.encrypt(&vec![b'A'; align.pad_len + i])?.len();
        if len != padded_len {
            return Ok(padded_len - align.msg_offset - i);
        }
    }
    UnexpectedOracleSnafu {
        message: "ciphertext length never changed while probing suffix length",
    }.fail()
}

// Recovers the oracle's fixed secret suffix one byte at a time. Each probe
// shortens the filler so the next unknown byte lands at the end of a block,
// then tries all 256 values for it and compares against the reference
// ciphertext for that filler length. The search must find exactly one match:
// anything else means the oracle does not behave like a fixed-suffix ECB
// encryptor and is reported as such
pub fn recover_suffix(oracle: &dyn Encryptor) -> Result<Vec<u8>> {
    let block_size = determine_block_size(oracle)?;
    let align = find_alignment(oracle, block_size)?;
    let suffix_len = find_suffix_len(oracle, block_size, &align)?;

    // One reference ciphertext per intra-block filler length; the recovery
    // loop cycles through these, so fetch each once up front
    let references: Vec<Vec<u8>> = (0..block_size)
        .map(|filler| oracle.encrypt(&vec![b'A'; align.pad_len + filler]))
        .collect::<Result<_>>()?;

    let mut known: Vec<u8> = Vec::with_capacity(suffix_len);
    while known.len() < suffix_len {
        let block_idx = known.len() / block_size;
        let byte_idx = known.len() % block_size;
        let filler = block_size - 1 - byte_idx;
        let compare_len = (block_idx + 1) * block_size;
        let reference =
            &references[filler][align.msg_offset..align.msg_offset + compare_len];

        let mut matches: Vec<u8> = Vec::new();
        for candidate in 0..=u8::MAX {
            let payload = [
                vec![b'A'; align.pad_len + filler],
                known.clone(),
                vec![candidate],
            ].concat();
            let encrypted = oracle.encrypt(&payload)?;
            if &encrypted[align.msg_offset..align.msg_offset + compare_len] == reference {
                matches.push(candidate);
            }
        }

        match matches.as_slice() {
            [byte] => known.push(*byte),
            [] => return NoCandidateSnafu.fail(),
            _ => return AmbiguousCandidateSnafu { count: matches.len() }.fail(),
        }
    }
    Ok(known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::oracle::EcbSuffixOracle;
    use base64::{engine::general_purpose, Engine as _};

    const SECRET_SUFFIX: &[u8] =
        b"Um9sbGluJyBpbiBteSA1LjAKV2l0aCBteSByYWctdG9wIGRvd24gc28gbXkgaGFpciBjYW4gYmxvdwpUaGUgZ2lybGllcyBvbiBzdGFuZGJ5IHdhdmluZyBqdXN0IHRvIHNheSBoaQpEaWQgeW91IHN0b3A/IE5vLCBJIGp1c3QgZHJvdmUgYnkK";

    fn secret_suffix() -> Vec<u8> {
        general_purpose::STANDARD
            .decode(SECRET_SUFFIX)
            .expect("Base64 decoding failed")
    }

    #[test]
    fn test_recover_suffix_without_prefix() {
        let suffix = secret_suffix();
        assert_eq!(138, suffix.len());
        let oracle = EcbSuffixOracle::new(suffix.clone());
        assert_eq!(suffix, recover_suffix(&oracle).unwrap());
    }

    #[test]
    fn test_recover_suffix_with_random_prefix() {
        let suffix = secret_suffix();
        for _ in 0..3 {
            let oracle = EcbSuffixOracle::with_random_prefix(suffix.clone());
            assert_eq!(suffix, recover_suffix(&oracle).unwrap());
        }
    }
}
