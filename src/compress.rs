//! Block decompression boundary.
//!
//! The file format fixes a single well-known streaming codec (`zstd`,
//! matching the reference verifier's use of the `zstandard` library).
//! The verifier only ever calls `decompress` with an explicit upper
//! bound on the uncompressed size, and treats anything beyond that
//! bound, or a codec-level failure, as a malformed stream.

use crate::errors;
use crate::Result;

/// Decompresses `ciphertext`, rejecting output larger than
/// `upper_bound` bytes.
///
/// `upper_bound` is supplied by the caller (`4*n` for the residual
/// block, `10*n` for the permutation block) rather than trusted from
/// the compressed stream itself.
pub fn decompress(ciphertext: &[u8], upper_bound: usize) -> Result<Vec<u8>> {
    // `zstd::bulk::decompress` treats its capacity argument as a hard
    // ceiling, not a hint, so it must be the full caller-supplied bound
    // (4*n for residuals, 10*n for the permutation block) rather than a
    // fixed clamp — otherwise a legitimately large payload is rejected.
    let raw = match zstd::bulk::decompress(ciphertext, upper_bound) {
        Ok(raw) => raw,
        Err(_) => return errors::malformed("failed to decompress block"),
    };

    if raw.len() > upper_bound {
        return errors::malformed("decompressed block exceeds declared upper bound");
    }

    Ok(raw)
}
