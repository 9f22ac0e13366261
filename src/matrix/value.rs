//! Value types accepted by the ParILUT kernels

use std::cmp::Ordering;
use std::fmt;

use num_complex::Complex;
use num_traits::{Float, Num};

/// A numeric type that can be stored in a factor
///
/// Thresholds and order statistics are computed on the magnitude of a
/// value, which lives in the associated real type: the absolute value for
/// real numbers, the modulus for complex numbers.
pub trait SparseValue: Copy + Num + Send + Sync + fmt::Debug + 'static {
    /// Real type holding magnitudes and thresholds
    type Real: Float + Send + Sync + fmt::Debug + 'static;

    /// Magnitude of this value
    fn magnitude(self) -> Self::Real;
}

impl SparseValue for f32 {
    type Real = f32;

    #[inline]
    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl SparseValue for f64 {
    type Real = f64;

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl SparseValue for Complex<f32> {
    type Real = f32;

    #[inline]
    fn magnitude(self) -> f32 {
        self.norm()
    }
}

impl SparseValue for Complex<f64> {
    type Real = f64;

    #[inline]
    fn magnitude(self) -> f64 {
        self.norm()
    }
}

/// Total order on magnitudes
///
/// Magnitudes are never negative, so only NaN needs special care: it sorts
/// after every other value.
#[inline]
pub fn compare_magnitudes<R: Float>(a: &R, b: &R) -> Ordering {
    match a.partial_cmp(b) {
        Some(ordering) => ordering,
        None => a.is_nan().cmp(&b.is_nan()),
    }
}
