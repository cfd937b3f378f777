// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::sieve::Sieve;
use crate::thresholds::thresholds;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use submax_core::{
    OptimizerState, SubmaxError, SubmodularFunction, SubmodularOptimizer, validate_budget,
};

pub(crate) fn validate_singleton_bound(m: f64) -> Result<(), SubmaxError> {
    if !m.is_finite() || m <= 0.0 {
        return Err(SubmaxError::invalid_input(format!(
            "singleton bound m must be finite and > 0; got {m}"
        )));
    }
    Ok(())
}

/// SieveStreaming for nonnegative monotone submodular objectives
/// (Badanidiyuru et al., 2014).
///
/// One sieve per threshold in `{(1 + epsilon)^i}` between `m` and `K * m`,
/// where `m` bounds the best singleton value. Every stream element is
/// offered to every sieve; a sieve commits when the marginal gain clears its
/// residual floor. The outer state always mirrors the best sieve.
///
/// Solution quality `1/2 - epsilon`; memory `O(K log(K) / epsilon)`;
/// `O(log(K) / epsilon)` objective queries per element.
pub struct SieveStreaming {
    k: usize,
    sieves: Vec<Sieve>,
    state: OptimizerState,
}

impl SieveStreaming {
    pub fn new(
        k: usize,
        f: impl SubmodularFunction + 'static,
        m: f64,
        epsilon: f64,
    ) -> Result<Self, SubmaxError> {
        validate_budget(k)?;
        validate_singleton_bound(m)?;

        let grid = thresholds(m, k as f64 * m, epsilon)?;
        let f: Box<dyn SubmodularFunction> = Box::new(f);
        let sieves = grid
            .into_iter()
            .map(|threshold| Sieve::new(k, f.clone_box(), threshold))
            .collect();

        Ok(Self {
            k,
            sieves,
            state: OptimizerState::new(),
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Copies the best sieve's solution into the outer state.
    fn promote_best(&mut self) {
        for sieve in &self.sieves {
            if sieve.state.fval > self.state.fval {
                self.state.fval = sieve.state.fval;
                self.state.solution = sieve.state.solution.clone();
                self.state.ids = sieve.state.ids.clone();
            }
        }
    }
}

impl SubmodularOptimizer for SieveStreaming {
    fn next(&mut self, x: &[f64], id: Option<u64>) -> Result<(), SubmaxError> {
        // Sieves own disjoint state, so the per-item loop may fan out; the
        // best-fval promotion stays sequential either way.
        #[cfg(feature = "rayon")]
        {
            self.sieves
                .par_iter_mut()
                .try_for_each(|sieve| sieve.next_with_floor(x, id))?;
        }
        #[cfg(not(feature = "rayon"))]
        {
            for sieve in &mut self.sieves {
                sieve.next_with_floor(x, id)?;
            }
        }

        self.promote_best();
        self.state.is_fitted = true;
        Ok(())
    }

    fn solution(&self) -> &[Vec<f64>] {
        &self.state.solution
    }

    fn ids(&self) -> &[u64] {
        &self.state.ids
    }

    fn fval(&self) -> f64 {
        self.state.fval
    }

    fn is_fitted(&self) -> bool {
        self.state.is_fitted
    }

    fn num_candidate_solutions(&self) -> usize {
        self.sieves.len()
    }

    fn num_elements_stored(&self) -> usize {
        self.sieves
            .iter()
            .map(|sieve| sieve.state.solution.len())
            .sum()
    }
}
