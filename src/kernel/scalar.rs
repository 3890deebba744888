//! Scalar reference kernel.

use crate::kernel::{Kernel, Moments};

/// Scalar kernel accumulating moments one sample at a time.
pub struct ScalarKernel;

impl Kernel for ScalarKernel {
    fn moments(a: &[u8], b: &[u8]) -> Moments {
        assert_eq!(a.len(), b.len(), "channel buffers must have equal length");

        let mut m = Moments {
            n: a.len() as u64,
            ..Moments::default()
        };
        for (&va, &vb) in a.iter().zip(b.iter()) {
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
