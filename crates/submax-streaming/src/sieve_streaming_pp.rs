// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::sieve::Sieve;
use crate::sieve_streaming::validate_singleton_bound;
use crate::thresholds::thresholds;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use submax_core::{
    OptimizerState, SubmaxError, SubmodularFunction, SubmodularOptimizer, validate_budget,
};

/// SieveStreaming++ (Kazemi et al., 2019).
///
/// Keeps the best fval seen so far as an adaptive lower bound on the
/// optimum. Whenever the bound improves, sieves below the new minimum
/// useful threshold `max(lower_bound, m) / (2K)` are discarded and the grid
/// is re-sampled, which shrinks the live set from `O(K log(K) / epsilon)` to
/// `O(K / epsilon)` candidate solutions. Unlike SieveStreaming, each sieve
/// commits on the fixed test `gain >= threshold`.
pub struct SieveStreamingPp {
    k: usize,
    m: f64,
    epsilon: f64,
    lower_bound: f64,
    f: Box<dyn SubmodularFunction>,
    sieves: Vec<Sieve>,
    state: OptimizerState,
}

impl SieveStreamingPp {
    pub fn new(
        k: usize,
        f: impl SubmodularFunction + 'static,
        m: f64,
        epsilon: f64,
    ) -> Result<Self, SubmaxError> {
        validate_budget(k)?;
        validate_singleton_bound(m)?;
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(SubmaxError::invalid_input(format!(
                "SieveStreamingPp epsilon must be a positive real number; got {epsilon}"
            )));
        }

        // Sieves are materialized lazily on the first `next`, once the first
        // lower bound is known.
        Ok(Self {
            k,
            m,
            epsilon,
            lower_bound: 0.0,
            f: Box::new(f),
            sieves: vec![],
            state: OptimizerState::new(),
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn refresh_sieves(&mut self) -> Result<(), SubmaxError> {
        self.lower_bound = self.state.fval;
        let tau_min = self.lower_bound.max(self.m) / (2.0 * self.k as f64);

        let before = self.sieves.len();
        self.sieves.retain(|sieve| sieve.threshold >= tau_min);

        if before > self.sieves.len() || before == 0 {
            let grid = thresholds(
                tau_min / (1.0 + self.epsilon),
                self.k as f64 * self.m,
                self.epsilon,
            )?;
            for threshold in grid {
                let exists = self.sieves.iter().any(|sieve| sieve.threshold == threshold);
                if !exists {
                    self.sieves
                        .push(Sieve::new(self.k, self.f.clone_box(), threshold));
                }
            }
        }
        Ok(())
    }

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

impl SubmodularOptimizer for SieveStreamingPp {
    fn next(&mut self, x: &[f64], id: Option<u64>) -> Result<(), SubmaxError> {
        if self.lower_bound != self.state.fval || self.sieves.is_empty() {
            self.refresh_sieves()?;
        }

        #[cfg(feature = "rayon")]
        {
            self.sieves
                .par_iter_mut()
                .try_for_each(|sieve| sieve.next_with_fixed_threshold(x, id))?;
        }
        #[cfg(not(feature = "rayon"))]
        {
            for sieve in &mut self.sieves {
                sieve.next_with_fixed_threshold(x, id)?;
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
