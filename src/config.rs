//! Resource caps enforced by the container parser before any allocation
//! proportional to a length read from the file.

/// Caps bounding worst-case work on an adversarial input. Passed
/// explicitly into `parse_container` rather than read from a global, so
/// a single process verifying many files never carries shared mutable
/// state between them.
#[derive(Clone, Copy, Debug)]
pub struct VerifyConfig {
    /// Maximum element count `n`.
    pub max_elements: u64,
    /// Maximum compressed-payload size, applied to both the residual
    /// and permutation blocks.
    pub max_compressed_bytes: u64,
}

impl VerifyConfig {
    pub const DEFAULT_MAX_ELEMENTS: u64 = 1 << 28;
    pub const DEFAULT_MAX_COMPRESSED_BYTES: u64 = 1 << 30;
}

impl Default for VerifyConfig {
    fn default() -> Self {
        VerifyConfig {
            max_elements: Self::DEFAULT_MAX_ELEMENTS,
            max_compressed_bytes: Self::DEFAULT_MAX_COMPRESSED_BYTES,
        }
    }
}
