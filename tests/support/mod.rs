//! Test-only PCMP file encoder.
//!
//! This is deliberately not part of the library: producing PCMP files is
//! out of scope for the verifier (see SPEC_FULL.md's Non-goals). It
//! exists only so the integration tests can build real, bit-exact
//! fixtures instead of hand-assembling opaque byte literals.

use sha2::{Digest, Sha256};

pub const CHUNK_BYTES: u64 = 1 << 22;
const FOOTER_MAGIC: u32 = 0x5043_4D50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    One,
    Two,
}

impl Order {
    fn as_u8(self) -> u8 {
        match self {
            Order::One => 1,
            Order::Two => 2,
        }
    }
}

fn forward_order1(k: &[u32]) -> Vec<u32> {
    let mut r = k.to_vec();
    for i in (1..r.len()).rev() {
        r[i] = r[i].wrapping_sub(k[i - 1]);
    }
    r
}

fn forward_order2(k: &[u32]) -> Vec<u32> {
    let mut r = k.to_vec();
    for i in (2..r.len()).rev() {
        let predicted = (2u32.wrapping_mul(k[i - 1])).wrapping_sub(k[i - 2]);
        r[i] = r[i].wrapping_sub(predicted);
    }
    if r.len() >= 2 {
        r[1] = r[1].wrapping_sub(k[0]);
    }
    r
}

fn encode_zigzag(delta: i64) -> u64 {
    ((delta << 1) ^ (delta >> 63)) as u64
}

fn encode_uleb128(mut v: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            break;
        } else {
            out.push(byte | 0x80);
        }
    }
}

fn encode_permutation(perm: &[u64]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut running: u64 = 0;
    for &p in perm {
        let delta = (p as i64).wrapping_sub(running as i64);
        running = running.wrapping_add(delta as u64);
        encode_uleb128(encode_zigzag(delta), &mut out);
    }
    out
}

fn merkle_root(data: &[u8]) -> [u8; 32] {
    if data.is_empty() {
        return [0u8; 32];
    }
    let mut level: Vec<[u8; 32]> = data
        .chunks(CHUNK_BYTES as usize)
        .map(|chunk| {
            let mut h = Sha256::new();
            h.update(chunk);
            h.finalize().into()
        })
        .collect();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut pairs = level.chunks_exact(2);
        for pair in &mut pairs {
            let mut h = Sha256::new();
            h.update(pair[0]);
            h.update(pair[1]);
            next.push(h.finalize().into());
        }
        if let [last] = pairs.remainder() {
            next.push(*last);
        }
        level = next;
    }
    level[0]
}

/// Knobs for building a deliberately non-conforming fixture on top of an
/// otherwise-valid file. Each field defaults to "don't corrupt".
#[derive(Default)]
pub struct Corruption {
    pub permutation_override: Option<Vec<u64>>,
    pub flip_root_byte: bool,
    pub nan_override: Option<(usize, u32)>,
}

/// Builds a complete, well-formed (unless `corruption` says otherwise)
/// PCMP byte buffer for the ordered key sequence `keys`.
pub fn build_file(keys: &[u32], order: Order, corruption: Corruption) -> Vec<u8> {
    let n = keys.len();

    let mut keys = keys.to_vec();
    if let Some((idx, value)) = corruption.nan_override {
        keys[idx] = value;
    }

    let residuals = match order {
        Order::One => forward_order1(&keys),
        Order::Two => forward_order2(&keys),
    };

    let mut raw_residual_bytes = Vec::with_capacity(n * 4);
    for r in &residuals {
        raw_residual_bytes.extend_from_slice(&r.to_le_bytes());
    }
    let compressed_residuals = zstd::bulk::compress(&raw_residual_bytes, 0).unwrap();

    let identity_perm: Vec<u64> = (0..n as u64).collect();
    let perm = corruption.permutation_override.unwrap_or(identity_perm);
    let raw_perm_bytes = encode_permutation(&perm);
    let compressed_perm = zstd::bulk::compress(&raw_perm_bytes, 0).unwrap();

    let mut root = merkle_root(&raw_residual_bytes);
    if corruption.flip_root_byte {
        root[0] ^= 0xff;
    }

    let num_chunks = (raw_residual_bytes.len() as u64).div_ceil(CHUNK_BYTES);

    let mut buf = Vec::new();
    buf.extend_from_slice(b"PCMP");
    buf.push(1); // version
    buf.push(order.as_u8());
    buf.extend_from_slice(&[0, 0]); // reserved
    buf.extend_from_slice(&(n as u64).to_le_bytes());

    buf.extend_from_slice(&(compressed_residuals.len() as u64).to_le_bytes());
    buf.extend_from_slice(&compressed_residuals);

    buf.extend_from_slice(&(compressed_perm.len() as u64).to_le_bytes());
    buf.extend_from_slice(&compressed_perm);

    buf.extend_from_slice(&1u64.to_le_bytes()); // proof_type
    buf.extend_from_slice(&(n as u64).to_le_bytes()); // total_n
    buf.extend_from_slice(&CHUNK_BYTES.to_le_bytes());
    buf.extend_from_slice(&num_chunks.to_le_bytes());
    buf.extend_from_slice(&(order.as_u8() as u32).to_le_bytes()); // ordering_mode

    buf.extend_from_slice(&root);

    buf.extend_from_slice(&FOOTER_MAGIC.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes());

    buf
}
