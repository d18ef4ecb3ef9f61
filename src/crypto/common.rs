use rand::RngCore;
use std::collections::HashSet;

pub fn generate_random_bytes<const N: usize>() -> [u8; N] {
    let mut data = [0u8; N];
    rand::thread_rng().fill_bytes(&mut data);
    data
}

pub fn round_up_to_nearest_multiple(n: usize, m: usize) -> usize {
    m*( (n + (m-1)) / m )
}

#[test]
fn test_round_up_to_nearest_multiple() {
    assert_eq!(16, round_up_to_nearest_multiple(1, 16));
    assert_eq!(16, round_up_to_nearest_multiple(16, 16));
    assert_eq!(32, round_up_to_nearest_multiple(17, 16));
}

pub fn repeating_block(arr: &[u8], size: usize) -> Option<(usize, Vec<u8>)> {
    let mut blocks: HashSet<&[u8]> = HashSet::new();
    for (idx, block) in arr.chunks(size).enumerate() {
        if blocks.contains(block) {
            return Some((idx, block.to_vec()));
        }
        blocks.insert(block);
    }
    None
}

#[test]
fn test_repeating_block() {
    let arr = b"aaabbbcccaaa";
    assert_eq!(Some((3, b"aaa".to_vec())), repeating_block(arr, 3));
    assert_eq!(None,                       repeating_block(arr, 4));
}

// Returns the index of the first byte following the repeated pair. Only
// adjacent, block-aligned repeats count: the prefix-alignment search needs to
// know exactly where its two filler blocks landed
pub fn adjacent_repeated_block(arr: &[u8], size: usize) -> Option<usize> {
    let blocks: Vec<&[u8]> = arr.chunks(size).collect();
    for i in 0..blocks.len().saturating_sub(1) {
        if blocks[i] == blocks[i + 1] && blocks[i].len() == size {
            return Some((i + 2) * size);
        }
    }
    None
}

#[test]
fn test_adjacent_repeated_block() {
    let arr = b"aaabbbcccaaa";
    assert_eq!(None, adjacent_repeated_block(arr, 3));
    let arr_2 = b"cccaaaaaabbb";
    assert_eq!(Some(9), adjacent_repeated_block(arr_2, 3));
}
