//! SIMD-accelerated moment accumulation using the `wide` crate.
//!
//! Samples are widened to `f64x4` lanes. Every lane holds integer-valued sums
//! that stay below 2^53 for any realistic image, so the lane totals convert
//! back to `u64` exactly and match the scalar kernel bit for bit.

use crate::kernel::{Kernel, Moments};
use wide::f64x4;

const LANES: usize = 4;

/// Load 4 u8 values and convert to f64x4.
#[inline]
fn load_u8x4_as_f64x4(slice: &[u8]) -> f64x4 {
    f64x4::from([
        slice[0] as f64,
        slice[1] as f64,
        slice[2] as f64,
        slice[3] as f64,
    ])
}

/// Horizontal sum of f64x4 as an exact integer.
#[inline]
fn hsum(v: f64x4) -> u64 {
    v.to_array().iter().map(|&lane| lane as u64).sum()
}

/// SIMD kernel processing four samples per step.
pub struct SimdKernel;

impl Kernel for SimdKernel {
    fn moments(a: &[u8], b: &[u8]) -> Moments {
        assert_eq!(a.len(), b.len(), "channel buffers must have equal length");

        let mut sum_a = f64x4::ZERO;
        let mut sum_b = f64x4::ZERO;
        let mut sum_aa = f64x4::ZERO;
        let mut sum_bb = f64x4::ZERO;
        let mut sum_ab = f64x4::ZERO;

        let simd_end = a.len() / LANES * LANES;
        let mut i = 0;
        while i < simd_end {
            let va = load_u8x4_as_f64x4(&a[i..]);
            let vb = load_u8x4_as_f64x4(&b[i..]);
            sum_a += va;
            sum_b += vb;
            sum_aa += va * va;
            sum_bb += vb * vb;
            sum_ab += va * vb;
            i += LANES;
        }

        let mut m = Moments {
            n: a.len() as u64,
            sum_a: hsum(sum_a),
            sum_b: hsum(sum_b),
            sum_aa: hsum(sum_aa),
            sum_bb: hsum(sum_bb),
            sum_ab: hsum(sum_ab),
        };

        // Scalar remainder
        for (&va, &vb) in a[simd_end..].iter().zip(b[simd_end..].iter()) {
            let va = va as u64;
            let vb = vb as u64;
            m.sum_a += va;
            m.sum_b += vb;
            m.sum_aa += va * va;
            m.sum_bb += vb * vb;
            m.sum_ab += va * vb;
        }
        m
    }
}
