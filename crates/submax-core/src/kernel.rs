// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::SubmaxError;
use std::sync::Arc;

/// Pairwise similarity function over points.
///
/// Implementations must be pure and symmetric (`k(x, y) == k(y, x)`) with
/// `k(x, x) >= 0`. Cloning through [`Kernel::clone_box`] exists so that
/// objectives owning a kernel can themselves be cloned into independent
/// optimizer instances.
pub trait Kernel: Send + Sync {
    fn eval(&self, x: &[f64], y: &[f64]) -> f64;

    fn clone_box(&self) -> Box<dyn Kernel>;
}

impl Clone for Box<dyn Kernel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Radial basis function kernel.
///
/// `k(x, y) = scale * exp(-||x - y||^2 / sigma)` for distinct points and
/// exactly `scale` when the slices compare equal (no exponential evaluated).
///
/// The divisor is `sigma`, not the textbook `2 * sigma^2`. Callers wanting
/// the textbook bandwidth pass `2 * sigma^2` as `sigma`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RbfKernel {
    sigma: f64,
    scale: f64,
}

impl RbfKernel {
    pub fn new(sigma: f64, scale: f64) -> Result<Self, SubmaxError> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(SubmaxError::invalid_input(format!(
                "RbfKernel sigma must be finite and > 0; got {sigma}"
            )));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SubmaxError::invalid_input(format!(
                "RbfKernel scale must be finite and > 0; got {scale}"
            )));
        }
        Ok(Self { sigma, scale })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Kernel for RbfKernel {
    fn eval(&self, x: &[f64], y: &[f64]) -> f64 {
        if x == y {
            return self.scale;
        }

        let mut dist_sq = 0.0;
        for (a, b) in x.iter().zip(y.iter()) {
            let delta = b - a;
            dist_sq += delta * delta;
        }
        self.scale * (-dist_sq / self.sigma).exp()
    }

    fn clone_box(&self) -> Box<dyn Kernel> {
        Box::new(*self)
    }
}

/// Adapts a plain closure to the [`Kernel`] trait.
///
/// Clones share the underlying closure, which is sound because kernels are
/// required to be pure functions of their arguments.
#[derive(Clone)]
pub struct ClosureKernel {
    f: Arc<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>,
}

impl ClosureKernel {
    pub fn new(f: impl Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl Kernel for ClosureKernel {
    fn eval(&self, x: &[f64], y: &[f64]) -> f64 {
        (self.f)(x, y)
    }

    fn clone_box(&self) -> Box<dyn Kernel> {
        Box::new(self.clone())
    }
}

impl std::fmt::Debug for ClosureKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureKernel").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{ClosureKernel, Kernel, RbfKernel};
    use crate::error::SubmaxError;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "expected {expected}, got {actual}, |diff|={diff}, tol={tol}"
        );
    }

    #[test]
    fn rbf_on_identical_points_returns_scale_exactly() {
        let kernel = RbfKernel::new(2.0, 1.0).expect("valid parameters");
        assert_eq!(kernel.eval(&[0.3, 0.7], &[0.3, 0.7]), 1.0);

        let scaled = RbfKernel::new(2.0, 3.5).expect("valid parameters");
        assert_eq!(scaled.eval(&[1.0], &[1.0]), 3.5);
    }

    #[test]
    fn rbf_uses_sigma_divisor_not_two_sigma_squared() {
        // ||0 - 1||^2 / 2 = 0.5, so k = exp(-0.5).
        let kernel = RbfKernel::new(2.0, 1.0).expect("valid parameters");
        assert_close(kernel.eval(&[0.0], &[1.0]), (-0.5_f64).exp(), 1e-12);
        assert_close(kernel.eval(&[0.0], &[1.0]), 0.606_530_659_7, 1e-9);
    }

    #[test]
    fn rbf_is_symmetric() {
        let kernel = RbfKernel::new(0.7, 2.0).expect("valid parameters");
        let x = [0.1, -0.4, 2.0];
        let y = [1.3, 0.0, -0.2];
        assert_close(kernel.eval(&x, &y), kernel.eval(&y, &x), 0.0);
    }

    #[test]
    fn rbf_rejects_non_positive_parameters() {
        for (sigma, scale) in [(0.0, 1.0), (-1.0, 1.0), (1.0, 0.0), (1.0, -2.0)] {
            let err = RbfKernel::new(sigma, scale).expect_err("parameters must be rejected");
            assert!(matches!(err, SubmaxError::InvalidInput(_)));
        }
        assert!(RbfKernel::new(f64::NAN, 1.0).is_err());
        assert!(RbfKernel::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn boxed_kernel_clone_is_independent_of_the_original_binding() {
        let kernel: Box<dyn Kernel> = Box::new(RbfKernel::new(1.0, 1.0).expect("valid"));
        let copy = kernel.clone();
        drop(kernel);
        assert_close(copy.eval(&[0.0], &[0.0]), 1.0, 0.0);
    }

    #[test]
    fn closure_kernel_delegates_to_the_closure() {
        let kernel = ClosureKernel::new(|x: &[f64], y: &[f64]| {
            x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
        });
        assert_close(kernel.eval(&[1.0, 2.0], &[3.0, 4.0]), 11.0, 0.0);

        let copy = kernel.clone_box();
        assert_close(copy.eval(&[1.0, 2.0], &[3.0, 4.0]), 11.0, 0.0);
    }
}
