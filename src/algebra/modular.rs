//! Arithmetic in ℤ/Pℤ for P = 1,000,000,007
//!
//! Operands are 32-bit; every intermediate is widened to 64 bits so
//! sums and products never overflow before the reduction.

/// The fixed prime modulus bounding every merged value
pub const MODULUS: i64 = 1_000_000_007;

/// Reduce any 64-bit value into `[0, P-1]`
///
/// Uses the Euclidean remainder, so negative inputs land in range too.
#[inline]
pub fn reduce(value: i64) -> i32 {
    // MODULUS < i32::MAX, so the narrowing is lossless
    value.rem_euclid(MODULUS) as i32
}

/// `(a + b) mod P`
#[inline]
pub fn add(a: i32, b: i32) -> i32 {
    reduce(a as i64 + b as i64)
}

/// `(a * b) mod P`
#[inline]
pub fn mul(a: i32, b: i32) -> i32 {
    reduce(a as i64 * b as i64)
}
