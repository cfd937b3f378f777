// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::gram::reference_log_det;
use crate::ivm::validate_sigma;
use submax_core::{Kernel, SubmaxError, SubmodularFunction, SymmetricMatrix, validate_budget};

/// Incrementally factored informative vector machine objective.
///
/// Maintains a lower-triangular `L` with
/// `L[0..k, 0..k] * L^T = I_k + K(S, S) / sigma^2`, rows in the insertion
/// order of the committed solution, together with the running
/// `fval = 2 * sum ln L[i, i]`. Probing a candidate append is one forward
/// substitution against `L`, so `peek` and `update` are `O(k^2)` instead of
/// the `O(k^3)` refactorization of [`crate::Ivm`].
///
/// Only append placements (`pos == |S|`) are supported; the optimizers in
/// this workspace never exercise the replace case.
#[derive(Clone)]
pub struct FastIvm {
    kernel: Box<dyn Kernel>,
    sigma: f64,
    k_max: usize,
    factor: SymmetricMatrix,
    committed: usize,
    fval: f64,
    // Scratch for the probe path; sized once so the hot path never allocates.
    row: Vec<f64>,
    solved: Vec<f64>,
}

impl FastIvm {
    pub fn new(
        k_max: usize,
        kernel: impl Kernel + 'static,
        sigma: f64,
    ) -> Result<Self, SubmaxError> {
        validate_budget(k_max)?;
        validate_sigma(sigma)?;
        Ok(Self {
            kernel: Box::new(kernel),
            sigma,
            k_max,
            factor: SymmetricMatrix::new(k_max),
            committed: 0,
            fval: 0.0,
            row: vec![0.0; k_max],
            solved: vec![0.0; k_max],
        })
    }

    /// Number of committed rows of the maintained factor.
    pub fn committed_len(&self) -> usize {
        self.committed
    }

    /// Running objective value of the committed solution.
    pub fn current_fval(&self) -> f64 {
        self.fval
    }

    fn check_placement(&self, solution: &[Vec<f64>], pos: usize) -> Result<(), SubmaxError> {
        if pos < solution.len() {
            return Err(SubmaxError::not_supported(format!(
                "FastIvm supports append placements only; got replace at pos {pos} with |S|={}",
                solution.len()
            )));
        }
        if solution.len() != self.committed {
            return Err(SubmaxError::invalid_input(format!(
                "solution length {} does not match committed factor size {}",
                solution.len(),
                self.committed
            )));
        }
        if self.committed >= self.k_max {
            return Err(SubmaxError::invalid_input(format!(
                "factor capacity k_max={} exhausted; cannot append element {}",
                self.k_max,
                self.committed + 1
            )));
        }
        Ok(())
    }

    /// Probes the append of `x`: fills the scratch kernel row and its
    /// forward-substitution solution, returning the new pivot `d^2`.
    fn probe_append(&mut self, solution: &[Vec<f64>], x: &[f64]) -> Result<f64, SubmaxError> {
        let k = self.committed;
        let sigma_sq = self.sigma * self.sigma;

        for (i, selected) in solution.iter().enumerate() {
            self.row[i] = self.kernel.eval(selected, x) / sigma_sq;
        }
        let diagonal = 1.0 + self.kernel.eval(x, x) / sigma_sq;

        // Forward substitution L * l = a over the committed block.
        for i in 0..k {
            let mut cross = 0.0;
            for j in 0..i {
                cross += self.factor.get(i, j) * self.solved[j];
            }
            self.solved[i] = (self.row[i] - cross) / self.factor.get(i, i);
        }

        let mut squared = 0.0;
        for value in &self.solved[..k] {
            squared += value * value;
        }

        let pivot = diagonal - squared;
        if !pivot.is_finite() || pivot <= 0.0 {
            return Err(SubmaxError::non_spd(format!(
                "append pivot {pivot} at size {k}; candidate duplicates the committed solution"
            )));
        }
        Ok(pivot)
    }
}

impl SubmodularFunction for FastIvm {
    /// Returns the cached value when `solution` has the committed length and
    /// falls back to a from-scratch factorization otherwise.
    fn eval(&self, solution: &[Vec<f64>]) -> f64 {
        if solution.len() == self.committed {
            return self.fval;
        }
        reference_log_det(self.kernel.as_ref(), self.sigma, solution)
    }

    fn peek(
        &mut self,
        solution: &[Vec<f64>],
        x: &[f64],
        pos: usize,
    ) -> Result<f64, SubmaxError> {
        self.check_placement(solution, pos)?;
        let pivot = self.probe_append(solution, x)?;
        Ok(self.fval + pivot.ln())
    }

    fn update(
        &mut self,
        solution: &[Vec<f64>],
        x: &[f64],
        pos: usize,
    ) -> Result<(), SubmaxError> {
        self.check_placement(solution, pos)?;
        let pivot = self.probe_append(solution, x)?;

        let k = self.committed;
        self.factor.replace_row(k, &self.solved[..k]);
        self.factor.set(k, k, pivot.sqrt());
        self.committed = k + 1;
        self.fval += pivot.ln();
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn SubmodularFunction> {
        Box::new(self.clone())
    }
}

impl std::fmt::Debug for FastIvm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastIvm")
            .field("sigma", &self.sigma)
            .field("k_max", &self.k_max)
            .field("committed", &self.committed)
            .field("fval", &self.fval)
            .finish_non_exhaustive()
    }
}
