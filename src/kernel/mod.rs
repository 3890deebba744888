//! Normalized cross-correlation kernels for channel buffers.
//!
//! Kernels reduce a pair of equal-length `u8` buffers to exact integer raw
//! moments. Everything derived from them (covariance, variances, squared
//! difference) is computed in `i128`, so a zero-variance channel is detected
//! as an exact zero rather than through a tolerance.

/// Exact raw moments of a pair of channel buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Moments {
    /// Number of samples.
    pub n: u64,
    /// Sum of `a[i]`.
    pub sum_a: u64,
    /// Sum of `b[i]`.
    pub sum_b: u64,
    /// Sum of `a[i]^2`.
    pub sum_aa: u64,
    /// Sum of `b[i]^2`.
    pub sum_bb: u64,
    /// Sum of `a[i] * b[i]`.
    pub sum_ab: u64,
}

/// Outcome of the correlation formula before degenerate resolution.
enum RawCorrelation {
    Defined(f64),
    /// At least one buffer has zero variance.
    Undefined { identical: bool },
}

impl Moments {
    /// Returns `n * sum(a*b) - sum(a) * sum(b)`.
    pub fn covariance_numerator(&self) -> i128 {
        self.n as i128 * self.sum_ab as i128 - self.sum_a as i128 * self.sum_b as i128
    }

    /// Returns `n * sum(a^2) - sum(a)^2`, which is zero iff `a` is constant.
    pub fn variance_numerator_a(&self) -> i128 {
        self.n as i128 * self.sum_aa as i128 - self.sum_a as i128 * self.sum_a as i128
    }

    /// Returns `n * sum(b^2) - sum(b)^2`, which is zero iff `b` is constant.
    pub fn variance_numerator_b(&self) -> i128 {
        self.n as i128 * self.sum_bb as i128 - self.sum_b as i128 * self.sum_b as i128
    }

    /// Returns `sum((a - b)^2)`, which is zero iff the buffers are identical.
    pub fn squared_difference(&self) -> i128 {
        self.sum_aa as i128 + self.sum_bb as i128 - 2 * self.sum_ab as i128
    }

    fn raw_correlation(&self) -> RawCorrelation {
        let var_a = self.variance_numerator_a();
        let var_b = self.variance_numerator_b();
        if var_a == 0 || var_b == 0 {
            return RawCorrelation::Undefined {
                identical: self.squared_difference() == 0,
            };
        }
        let denom = (var_a as f64 * var_b as f64).sqrt();
        RawCorrelation::Defined(self.covariance_numerator() as f64 / denom)
    }

    /// Returns the correlation coefficient in `[-1.0, 1.0]`.
    ///
    /// When either buffer has zero variance the coefficient is undefined; it
    /// resolves to `1.0` for identical buffers and `0.0` otherwise.
    pub fn correlation(&self) -> f64 {
        match self.raw_correlation() {
            RawCorrelation::Defined(score) => score.clamp(-1.0, 1.0),
            RawCorrelation::Undefined { identical: true } => 1.0,
            RawCorrelation::Undefined { identical: false } => 0.0,
        }
    }
}

/// Kernel trait for moment accumulation.
pub trait Kernel {
    /// Accumulates the raw moments of `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if the buffers differ in length.
    fn moments(a: &[u8], b: &[u8]) -> Moments;

    /// Computes the correlation coefficient of `a` and `b`.
    fn correlate(a: &[u8], b: &[u8]) -> f64 {
        Self::moments(a, b).correlation()
    }
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

pub use scalar::ScalarKernel;

#[cfg(feature = "simd")]
pub use simd::SimdKernel;

/// Kernel used by [`correlate`].
#[cfg(feature = "simd")]
pub type DefaultKernel = SimdKernel;

/// Kernel used by [`correlate`].
#[cfg(not(feature = "simd"))]
pub type DefaultKernel = ScalarKernel;

/// Computes the normalized cross-correlation of two equal-length buffers.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`. Buffers of mismatched length can only
/// arise from images whose sizes were never checked.
pub fn correlate(a: &[u8], b: &[u8]) -> f64 {
    DefaultKernel::correlate(a, b)
}
