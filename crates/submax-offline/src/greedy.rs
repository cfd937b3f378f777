// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use submax_core::{
    OptimizerState, SubmaxError, SubmodularFunction, SubmodularOptimizer, validate_budget,
};

/// Offline greedy maximization under a cardinality constraint.
///
/// Each round peeks every remaining candidate at the append position and
/// commits the one with the largest resulting value (first index wins ties).
/// For nonnegative monotone submodular objectives with `f(empty) = 0` the
/// selected set is within `1 - 1/e` of the optimum (Nemhauser, Wolsey &
/// Fisher, 1978).
///
/// Candidates whose peek fails the positive-definiteness check, or whose
/// peeked value is non-finite, are ineligible for the round; when no
/// candidate is eligible, selection stops early.
pub struct Greedy {
    k: usize,
    f: Box<dyn SubmodularFunction>,
    state: OptimizerState,
}

impl std::fmt::Debug for Greedy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Greedy")
            .field("k", &self.k)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Greedy {
    pub fn new(k: usize, f: impl SubmodularFunction + 'static) -> Result<Self, SubmaxError> {
        validate_budget(k)?;
        Ok(Self {
            k,
            f: Box::new(f),
            state: OptimizerState::new(),
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl SubmodularOptimizer for Greedy {
    fn fit(&mut self, items: &[Vec<f64>], ids: Option<&[u64]>) -> Result<(), SubmaxError> {
        if let Some(ids) = ids {
            if ids.len() != items.len() {
                return Err(SubmaxError::invalid_input(format!(
                    "ids length {} does not match items length {}",
                    ids.len(),
                    items.len()
                )));
            }
        }

        let mut remaining: Vec<usize> = (0..items.len()).collect();

        while self.state.solution.len() < self.k && !remaining.is_empty() {
            let pos = self.state.solution.len();
            let mut best: Option<(usize, f64)> = None;

            for (slot, &candidate) in remaining.iter().enumerate() {
                let value = match self.f.peek(&self.state.solution, &items[candidate], pos) {
                    Ok(value) if value.is_finite() => value,
                    Ok(_) => continue,
                    Err(err) if err.is_non_spd() => continue,
                    Err(err) => return Err(err),
                };
                let improves = best.is_none_or(|(_, current)| value > current);
                if improves {
                    best = Some((slot, value));
                }
            }

            let Some((slot, value)) = best else {
                // Every remaining candidate is ineligible; nothing left to add.
                break;
            };

            let chosen = remaining.remove(slot);
            self.f.update(&self.state.solution, &items[chosen], pos)?;
            self.state
                .push(&items[chosen], ids.map(|ids| ids[chosen]));
            self.state.fval = value;
        }

        self.state.is_fitted = true;
        Ok(())
    }

    fn next(&mut self, _x: &[f64], _id: Option<u64>) -> Result<(), SubmaxError> {
        Err(SubmaxError::not_supported(
            "Greedy does not support streaming data; use fit",
        ))
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
}
