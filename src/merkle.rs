//! Binary SHA-256 Merkle hasher over fixed-size chunks of the raw
//! residual byte stream, with an odd-leaf promotion rule.

use sha2::{Digest, Sha256};

/// Chunk size fixed by the on-wire contract: 2^22 bytes.
pub const CHUNK_BYTES: u64 = 1 << 22;

/// Computes the Merkle root over `data`, partitioned into `CHUNK_BYTES`
/// chunks (the final chunk may be shorter).
///
/// Leaves are `SHA256(chunk)`. Internal levels pair adjacent nodes
/// left-to-right and hash their concatenation; a level with an odd
/// count promotes its final node unchanged to the next level rather
/// than duplicating or padding it. An empty input's root is defined as
/// 32 zero bytes.
pub fn root(data: &[u8]) -> [u8; 32] {
    if data.is_empty() {
        return [0u8; 32];
    }

    let mut level: Vec<[u8; 32]> = data
        .chunks(CHUNK_BYTES as usize)
        .map(|chunk| {
            let mut hasher = Sha256::new();
            hasher.update(chunk);
            hasher.finalize().into()
        })
        .collect();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut pairs = level.chunks_exact(2);
        for pair in &mut pairs {
            let mut hasher = Sha256::new();
            hasher.update(pair[0]);
            hasher.update(pair[1]);
            next.push(hasher.finalize().into());
        }
        if let [last] = pairs.remainder() {
            next.push(*last);
        }
        level = next;
    }

    level[0]
}

/// Number of chunks `root` partitions `len` bytes into.
pub fn num_chunks(len: u64) -> u64 {
    len.div_ceil(CHUNK_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_zero_root() {
        assert_eq!(root(&[]), [0u8; 32]);
    }

    #[test]
    fn single_chunk_root_is_its_sha256() {
        let data = vec![7u8; 100];
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let expected: [u8; 32] = hasher.finalize().into();
        assert_eq!(root(&data), expected);
    }

    #[test]
    fn two_chunks_hash_concatenated_leaves() {
        let chunk_a = vec![1u8; CHUNK_BYTES as usize];
        let chunk_b = vec![2u8; 10];
        let data: Vec<u8> = chunk_a.iter().chain(chunk_b.iter()).copied().collect();

        let leaf_a: [u8; 32] = {
            let mut h = Sha256::new();
            h.update(&chunk_a);
            h.finalize().into()
        };
        let leaf_b: [u8; 32] = {
            let mut h = Sha256::new();
            h.update(&chunk_b);
            h.finalize().into()
        };
        let expected: [u8; 32] = {
            let mut h = Sha256::new();
            h.update(leaf_a);
            h.update(leaf_b);
            h.finalize().into()
        };

        assert_eq!(root(&data), expected);
    }

    #[test]
    fn odd_leaf_is_promoted_not_duplicated() {
        // Three chunks: the third leaf must be promoted unchanged into
        // the second level, not hashed with itself.
        let chunk = vec![9u8; CHUNK_BYTES as usize];
        let data: Vec<u8> = chunk
            .iter()
            .chain(chunk.iter())
            .chain(chunk.iter())
            .copied()
            .collect();

        let leaf: [u8; 32] = {
            let mut h = Sha256::new();
            h.update(&chunk);
            h.finalize().into()
        };
        let pair_hash: [u8; 32] = {
            let mut h = Sha256::new();
            h.update(leaf);
            h.update(leaf);
            h.finalize().into()
        };
        let expected: [u8; 32] = {
            let mut h = Sha256::new();
            h.update(pair_hash);
            h.update(leaf); // promoted, not duplicated
            h.finalize().into()
        };

        assert_eq!(root(&data), expected);
    }

    #[test]
    fn num_chunks_rounds_up() {
        assert_eq!(num_chunks(0), 0);
        assert_eq!(num_chunks(1), 1);
        assert_eq!(num_chunks(CHUNK_BYTES), 1);
        assert_eq!(num_chunks(CHUNK_BYTES + 1), 2);
    }
}
