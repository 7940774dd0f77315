//! Predictive inverse transforms: reconstruct the ordered key sequence
//! `K` from its residuals `R` under order-1 or order-2 prediction.
//!
//! All arithmetic is unsigned 32-bit modulo 2^32, matching the producer
//! exactly. This is the same IIR-style reconstruction shape as a fixed
//! linear predictor, generalized from FLAC's signed fixed-predictor
//! polynomials to PCMP's two unsigned recurrences.

use crate::errors;
use crate::Result;

/// Predictor order as read from the PCMP header byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    One,
    Two,
}

impl Order {
    pub fn from_byte(b: u8) -> Result<Order> {
        match b {
            1 => Ok(Order::One),
            2 => Ok(Order::Two),
            _ => errors::malformed("predictor order must be 1 or 2"),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Order::One => 1,
            Order::Two => 2,
        }
    }
}

/// Reconstructs the ordered key vector `K` from residuals `R` in place,
/// consuming `residuals` and returning it as `K`.
///
/// Order-1: `k[0] = r[0]`; `k[i] = k[i-1] + r[i]` for `i >= 1`.
/// Order-2: `k[0] = r[0]`; `k[1] = k[0] + r[1]`;
/// `k[i] = 2*k[i-1] - k[i-2] + r[i]` for `i >= 2`.
pub fn inverse(order: Order, mut residuals: Vec<u32>) -> Vec<u32> {
    match order {
        Order::One => {
            for i in 1..residuals.len() {
                residuals[i] = residuals[i - 1].wrapping_add(residuals[i]);
            }
        }
        Order::Two => {
            if residuals.len() >= 2 {
                residuals[1] = residuals[0].wrapping_add(residuals[1]);
            }
            for i in 2..residuals.len() {
                let predicted = (2u32.wrapping_mul(residuals[i - 1])).wrapping_sub(residuals[i - 2]);
                residuals[i] = predicted.wrapping_add(residuals[i]);
            }
        }
    }
    residuals
}

/// Finds the first index `i` such that `k[i-1] > k[i]`, if any.
pub fn first_ordering_violation(k: &[u32]) -> Option<usize> {
    (1..k.len()).find(|&i| k[i - 1] > k[i])
}
