// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::gram::reference_log_det;
use submax_core::{Kernel, SubmaxError, SubmodularFunction};

/// Informative vector machine objective, recomputed from scratch.
///
/// `f(S) = log det(I + K(S, S) / sigma^2)` where `K` is the kernel Gram
/// matrix over the ordered solution. Every call refactors the full matrix,
/// so `peek` costs `O(|S|^3)`; this is the ground-truth implementation that
/// [`crate::FastIvm`] is tested against, not something to run greedy on at
/// scale.
#[derive(Clone)]
pub struct Ivm {
    kernel: Box<dyn Kernel>,
    sigma: f64,
}

impl Ivm {
    pub fn new(kernel: impl Kernel + 'static, sigma: f64) -> Result<Self, SubmaxError> {
        validate_sigma(sigma)?;
        Ok(Self {
            kernel: Box::new(kernel),
            sigma,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

pub(crate) fn validate_sigma(sigma: f64) -> Result<(), SubmaxError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SubmaxError::invalid_input(format!(
            "IVM sigma must be finite and > 0; got {sigma}"
        )));
    }
    Ok(())
}

impl SubmodularFunction for Ivm {
    fn eval(&self, solution: &[Vec<f64>]) -> f64 {
        reference_log_det(self.kernel.as_ref(), self.sigma, solution)
    }

    fn peek(
        &mut self,
        solution: &[Vec<f64>],
        x: &[f64],
        pos: usize,
    ) -> Result<f64, SubmaxError> {
        let mut hypothetical = solution.to_vec();
        if pos >= hypothetical.len() {
            hypothetical.push(x.to_vec());
        } else {
            hypothetical[pos] = x.to_vec();
        }
        Ok(self.eval(&hypothetical))
    }

    fn update(
        &mut self,
        _solution: &[Vec<f64>],
        _x: &[f64],
        _pos: usize,
    ) -> Result<(), SubmaxError> {
        // Nothing is cached; eval always recomputes.
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn SubmodularFunction> {
        Box::new(self.clone())
    }
}

impl std::fmt::Debug for Ivm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ivm").field("sigma", &self.sigma).finish_non_exhaustive()
    }
}
