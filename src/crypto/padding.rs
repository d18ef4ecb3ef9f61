use snafu::prelude::*;

use crate::error::{InvalidPaddingSnafu, Result};

// Strict PKCS#7: always pads, even when the input is already block-aligned,
// so the pad length is recoverable from the final byte alone
pub fn pad(buf: &[u8], block_size: usize) -> Vec<u8> {
    let k = block_size - (buf.len() % block_size);
    [buf, &vec![k as u8; k]].concat()
}

#[test]
fn test_pad() {
    let case = b"YELLOW SUBMARINE";
    let expected = b"YELLOW SUBMARINE\x04\x04\x04\x04".to_vec();
    assert_eq!(expected, pad(case, 20));

    // A full extra block when already aligned
    let expected_2 = [case.to_vec(), vec![16u8; 16]].concat();
    assert_eq!(expected_2, pad(case, 16));
}

pub fn is_valid(buf: &[u8], block_size: usize) -> bool {
    if buf.is_empty() || buf.len() % block_size != 0 {
        return false;
    }
    let k = *buf.last().unwrap() as usize;
    if k == 0 || k > block_size {
        return false;
    }
    buf.iter()
        .rev()
        .take(k)
        .all(|&b| b as usize == k)
}

pub fn strip_or_fail(buf: &[u8], block_size: usize) -> Result<Vec<u8>> {
    ensure!(is_valid(buf, block_size), InvalidPaddingSnafu);
    let k = *buf.last().unwrap() as usize;
    Ok(buf[..buf.len() - k].to_vec())
}

#[test]
fn test_strip_or_fail() {
    use crate::error::Error;

    let case = b"ICE ICE BABY\x04\x04\x04\x04";
    assert_eq!(b"ICE ICE BABY".to_vec(), strip_or_fail(case, 16).unwrap());

    let case_2 = b"ICE ICE BABY\x05\x05\x05\x05";
    assert!(matches!(strip_or_fail(case_2, 16), Err(Error::InvalidPadding)));

    let case_3 = b"ICE ICE BABY\x01\x02\x03\x04";
    assert!(matches!(strip_or_fail(case_3, 16), Err(Error::InvalidPadding)));

    // A pad byte of zero is never valid
    let case_4 = b"ICE ICE BABY\x00\x00\x00\x00";
    assert!(matches!(strip_or_fail(case_4, 16), Err(Error::InvalidPadding)));

    let case_5 = [b"YELLOW SUBMARINE".to_vec(), vec![16u8; 16]].concat();
    assert_eq!(b"YELLOW SUBMARINE".to_vec(), strip_or_fail(&case_5, 16).unwrap());
}

#[test]
fn test_pad_strip_round_trip() {
    for len in 0..64 {
        let buf = vec![b'x'; len];
        let padded = pad(&buf, 16);
        assert_eq!(0, padded.len() % 16);
        assert!(padded.len() > buf.len());
        assert!(is_valid(&padded, 16));
        assert_eq!(buf, strip_or_fail(&padded, 16).unwrap());
    }
}
