// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use submax_core::{
    OptimizerState, StableRng, SubmaxError, SubmodularFunction, SubmodularOptimizer,
    validate_budget,
};

/// Seeded random baseline.
///
/// Samples `min(K, N)` distinct indices without replacement using a partial
/// Fisher-Yates shuffle over a deterministic splitmix64 generator, commits
/// the sampled items in draw order, and records the final objective value.
/// The same seed over the same data always reproduces the same solution.
pub struct Random {
    k: usize,
    seed: u64,
    f: Box<dyn SubmodularFunction>,
    state: OptimizerState,
}

impl Random {
    pub fn new(
        k: usize,
        f: impl SubmodularFunction + 'static,
        seed: u64,
    ) -> Result<Self, SubmaxError> {
        validate_budget(k)?;
        Ok(Self {
            k,
            seed,
            f: Box::new(f),
            state: OptimizerState::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SubmodularOptimizer for Random {
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

        let n = items.len();
        let draws = self.k.min(n);
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StableRng::new(self.seed);

        for i in 0..draws {
            let offset = rng.gen_range(n - i)?;
            indices.swap(i, i + offset);
        }

        for &chosen in &indices[..draws] {
            let pos = self.state.solution.len();
            match self.f.update(&self.state.solution, &items[chosen], pos) {
                Ok(()) => {
                    self.state
                        .push(&items[chosen], ids.map(|ids| ids[chosen]));
                }
                // A sampled duplicate cannot extend the factorization; the
                // draw is simply skipped.
                Err(err) if err.is_non_spd() => continue,
                Err(err) => return Err(err),
            }
        }

        self.state.fval = self.f.eval(&self.state.solution);
        self.state.is_fitted = true;
        Ok(())
    }

    fn next(&mut self, _x: &[f64], _id: Option<u64>) -> Result<(), SubmaxError> {
        Err(SubmaxError::not_supported(
            "Random is an offline baseline; use fit",
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
