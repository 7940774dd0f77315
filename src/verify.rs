//! The verifier orchestrator: composes the container parser, the
//! predictive inverse transforms, the ordered-float mapping, and the
//! Merkle hasher into a single pure function from bytes to a result
//! record.
//!
//! Per spec.md §4.8, the verifier never retries, never repairs, and
//! never mutates. A structural parse or decompression failure collapses
//! into a single `error` string and stops the pipeline early, keeping
//! whatever diagnostic fields were already populated. Once both
//! compressed blocks have been decompressed, all five independent
//! invariants are computed unconditionally, regardless of whether an
//! earlier one already failed.

use std::io::{Cursor, Read};
use std::path::Path;

use serde::Serialize;

use crate::config::VerifyConfig;
use crate::container::{self, ParsedFile};
use crate::io::DynamicBufReader;
use crate::merkle;
use crate::ordered_float;
use crate::predict;
use crate::varint;

/// The result record produced by a single verification. Every field
/// beyond `file`/`valid`/`error` mirrors a name in spec.md §6's exposed
/// interface contract.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyInfo {
    pub file: String,
    pub valid: bool,
    pub error: Option<String>,

    pub magic: Option<String>,
    pub version: Option<u8>,
    pub order: Option<u8>,
    pub n: Option<u64>,

    pub ordering_ok: Option<bool>,
    pub ordering_violation_index: Option<u64>,

    pub permutation_ok: Option<bool>,

    pub cvd_ok: Option<bool>,
    pub cvd_violation_index: Option<u64>,
    pub cvd_violation_reason: Option<String>,

    pub meta_ok: Option<bool>,
    pub proof_type: Option<u64>,
    pub ordering_mode: Option<u32>,
    pub chunk_bytes: Option<u64>,
    pub total_n: Option<u64>,
    pub num_chunks: Option<u64>,

    pub stored_merkle_root: Option<String>,
    pub computed_merkle_root: Option<String>,
    pub merkle_match: Option<bool>,

    pub footer_magic: Option<String>,
    pub footer_version: Option<u32>,
}

impl VerifyInfo {
    fn new(file: String) -> VerifyInfo {
        VerifyInfo {
            file,
            valid: false,
            error: None,
            magic: None,
            version: None,
            order: None,
            n: None,
            ordering_ok: None,
            ordering_violation_index: None,
            permutation_ok: None,
            cvd_ok: None,
            cvd_violation_index: None,
            cvd_violation_reason: None,
            meta_ok: None,
            proof_type: None,
            ordering_mode: None,
            chunk_bytes: None,
            total_n: None,
            num_chunks: None,
            stored_merkle_root: None,
            computed_merkle_root: None,
            merkle_match: None,
            footer_magic: None,
            footer_version: None,
        }
    }
}

impl VerifyInfo {
    /// Every field rendered as a `(name, value)` pair, in declaration
    /// order, for the CLI's `--info` dump. `None` renders as `"null"`,
    /// matching the reference verifier's plain-text report.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        fn s<T: std::fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map(|x| x.to_string()).unwrap_or_else(|| "null".to_string())
        }

        vec![
            ("file", self.file.clone()),
            ("valid", self.valid.to_string()),
            ("error", s(&self.error)),
            ("magic", s(&self.magic)),
            ("version", s(&self.version)),
            ("order", s(&self.order)),
            ("n", s(&self.n)),
            ("ordering_ok", s(&self.ordering_ok)),
            ("ordering_violation_index", s(&self.ordering_violation_index)),
            ("permutation_ok", s(&self.permutation_ok)),
            ("cvd_ok", s(&self.cvd_ok)),
            ("cvd_violation_index", s(&self.cvd_violation_index)),
            ("cvd_violation_reason", s(&self.cvd_violation_reason)),
            ("meta_ok", s(&self.meta_ok)),
            ("proof_type", s(&self.proof_type)),
            ("ordering_mode", s(&self.ordering_mode)),
            ("chunk_bytes", s(&self.chunk_bytes)),
            ("total_n", s(&self.total_n)),
            ("num_chunks", s(&self.num_chunks)),
            ("stored_merkle_root", s(&self.stored_merkle_root)),
            ("computed_merkle_root", s(&self.computed_merkle_root)),
            ("merkle_match", s(&self.merkle_match)),
            ("footer_magic", s(&self.footer_magic)),
            ("footer_version", s(&self.footer_version)),
        ]
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

/// Reads `path` and verifies it. IO failures never reach the caller as
/// a `Result`; they are materialized into the `error` field instead.
pub fn verify_path(path: &Path) -> VerifyInfo {
    let file = path.display().to_string();

    let open_and_read = || -> std::io::Result<Vec<u8>> {
        let handle = std::fs::File::open(path)?;
        let mut reader = DynamicBufReader::new(handle);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    };

    let bytes = match open_and_read() {
        Ok(bytes) => bytes,
        Err(err) => {
            let mut info = VerifyInfo::new(file);
            info.error = Some(err.to_string());
            return info;
        }
    };
    verify_bytes(file, &bytes)
}

/// Verifies an in-memory PCMP byte buffer. Pure function of `bytes`:
/// running it twice on the same input yields identical result records.
pub fn verify_bytes(file: String, bytes: &[u8]) -> VerifyInfo {
    let mut info = VerifyInfo::new(file);

    // Best-effort peek at the raw header fields so that, per spec.md
    // §4.8, a later structural failure still leaves these populated.
    if bytes.len() >= 16 {
        info.magic = Some(String::from_utf8_lossy(&bytes[0..4]).into_owned());
        info.version = Some(bytes[4]);
        info.order = Some(bytes[5]);
        info.n = Some(u64::from_le_bytes(bytes[8..16].try_into().unwrap()));
    }

    let cfg = VerifyConfig::default();
    let mut cursor = Cursor::new(bytes);
    let parsed: ParsedFile = match container::parse(&mut cursor, &cfg) {
        Ok(parsed) => parsed,
        Err(err) => {
            info.error = Some(err.to_string());
            return info;
        }
    };

    // The confirmed header fields supersede the best-effort peek above.
    info.magic = Some("PCMP".to_string());
    info.version = Some(1);
    info.order = Some(parsed.header.order.as_u8());
    info.n = Some(parsed.header.n);

    let n = parsed.header.n as usize;

    let raw_residual_bytes = match crate::compress::decompress(&parsed.residual_block, 4 * n) {
        Ok(raw) => raw,
        Err(err) => {
            info.error = Some(err.to_string());
            return info;
        }
    };
    if raw_residual_bytes.len() != 4 * n {
        info.error = Some("residual block did not decompress to exactly 4*n bytes".to_string());
        return info;
    }

    let residuals: Vec<u32> = raw_residual_bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect();

    let permutation_raw = match crate::compress::decompress(&parsed.permutation_block, 10 * n) {
        Ok(raw) => raw,
        Err(err) => {
            info.error = Some(err.to_string());
            return info;
        }
    };

    tracing::debug!(n, "both payload blocks decompressed, computing invariants");

    // --- ordering_ok ---
    let ordered_keys = predict::inverse(parsed.header.order, residuals);
    let violation = predict::first_ordering_violation(&ordered_keys);
    info.ordering_ok = Some(violation.is_none());
    info.ordering_violation_index = violation.map(|i| i as u64);

    // --- permutation_ok ---
    let (permutation, perm_decode_ok) = decode_permutation(&permutation_raw, n);
    info.permutation_ok = Some(perm_decode_ok && permutation_is_valid(&permutation, n));

    // --- cvd_ok (canonical value / float-form validity) ---
    let unmapped: Vec<u32> = ordered_keys.iter().map(|&k| ordered_float::unmap(k)).collect();
    let mut cvd_ok = true;
    for (i, &f) in unmapped.iter().enumerate() {
        if let Some(reason) = ordered_float::canonical_violation(f) {
            cvd_ok = false;
            info.cvd_violation_index = Some(i as u64);
            info.cvd_violation_reason = Some(reason.to_string());
            break;
        }
    }
    info.cvd_ok = Some(cvd_ok);

    // --- merkle_match ---
    let computed_root = merkle::root(&raw_residual_bytes);
    info.stored_merkle_root = Some(hex_encode(&parsed.stored_root));
    info.computed_merkle_root = Some(hex_encode(&computed_root));
    info.merkle_match = Some(computed_root == parsed.stored_root);

    // --- meta_ok ---
    let expected_chunks = merkle::num_chunks(raw_residual_bytes.len() as u64);
    let meta = &parsed.metadata;
    let meta_ok = meta.proof_type == 1
        && meta.total_n == parsed.header.n
        && meta.ordering_mode == parsed.header.order.as_u8() as u32
        && meta.chunk_bytes == merkle::CHUNK_BYTES
        && meta.num_chunks == expected_chunks
        && parsed.footer.magic == container::EXPECTED_FOOTER_MAGIC
        && parsed.footer.version == 1;
    info.meta_ok = Some(meta_ok);
    info.proof_type = Some(meta.proof_type);
    info.ordering_mode = Some(meta.ordering_mode);
    info.chunk_bytes = Some(meta.chunk_bytes);
    info.total_n = Some(meta.total_n);
    info.num_chunks = Some(meta.num_chunks);
    info.footer_magic = Some(format!("0x{:08x}", parsed.footer.magic));
    info.footer_version = Some(parsed.footer.version);

    info.valid = info.ordering_ok.unwrap()
        && info.merkle_match.unwrap()
        && info.permutation_ok.unwrap()
        && info.cvd_ok.unwrap()
        && info.meta_ok.unwrap();

    info
}

/// Delta-decodes the ULEB128/zig-zag permutation payload with a 64-bit
/// running accumulator (modulo 2^64, via `wrapping_add`). Returns the
/// decoded values and whether decoding itself succeeded (a malformed
/// varint stream still yields `permutation_ok = false` rather than an
/// aborting error, since the producer's mistake here is an invariant
/// violation, not a structural one, once the block has decompressed).
fn decode_permutation(buf: &[u8], n: usize) -> (Vec<u64>, bool) {
    let mut perm = Vec::with_capacity(n);
    let mut offset = 0usize;
    let mut running: u64 = 0;

    for _ in 0..n {
        let (value, consumed) = match varint::decode_uleb128(buf, offset) {
            Ok(pair) => pair,
            Err(_) => return (perm, false),
        };
        offset += consumed;
        let delta = varint::decode_zigzag(value);
        running = running.wrapping_add(delta as u64);
        perm.push(running);
    }

    (perm, true)
}

fn permutation_is_valid(perm: &[u64], n: usize) -> bool {
    if perm.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &p in perm {
        if p >= n as u64 {
            return false;
        }
        let idx = p as usize;
        if seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}
