// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use submax_core::{OptimizerState, SubmaxError, SubmodularFunction};

/// One candidate solution guarding a single threshold hypothesis.
///
/// Sieves exist only inside the streaming optimizers: they have no `fit`,
/// and their parent promotes the best of them after every stream element.
/// Each sieve owns an independent clone of the objective, so the committed
/// factorizations of different sieves never interact.
pub(crate) struct Sieve {
    pub(crate) threshold: f64,
    k: usize,
    f: Box<dyn SubmodularFunction>,
    pub(crate) state: OptimizerState,
}

impl Sieve {
    pub(crate) fn new(k: usize, f: Box<dyn SubmodularFunction>, threshold: f64) -> Self {
        Self {
            threshold,
            k,
            f,
            state: OptimizerState::new(),
        }
    }

    /// Marginal gain of appending `x`, or `None` when the candidate is
    /// ineligible (solution full, or the append would be non-SPD).
    fn marginal_gain(&mut self, x: &[f64]) -> Result<Option<f64>, SubmaxError> {
        let size = self.state.solution.len();
        if size >= self.k {
            return Ok(None);
        }
        match self.f.peek(&self.state.solution, x, size) {
            Ok(value) => Ok(Some(value - self.state.fval)),
            Err(err) if err.is_non_spd() => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn commit(&mut self, x: &[f64], id: Option<u64>, gain: f64) -> Result<(), SubmaxError> {
        let size = self.state.solution.len();
        self.f.update(&self.state.solution, x, size)?;
        self.state.push(x, id);
        self.state.fval += gain;
        Ok(())
    }

    /// SieveStreaming acceptance: the gain must reach the residual floor
    /// `(threshold / 2 - fval) / (K - |S|)`.
    pub(crate) fn next_with_floor(&mut self, x: &[f64], id: Option<u64>) -> Result<(), SubmaxError> {
        let Some(gain) = self.marginal_gain(x)? else {
            return Ok(());
        };
        let remaining = (self.k - self.state.solution.len()) as f64;
        let floor = (self.threshold / 2.0 - self.state.fval) / remaining;
        if gain >= floor {
            self.commit(x, id, gain)?;
        }
        Ok(())
    }

    /// SieveStreaming++ acceptance: the gain must reach the sieve threshold
    /// itself.
    pub(crate) fn next_with_fixed_threshold(
        &mut self,
        x: &[f64],
        id: Option<u64>,
    ) -> Result<(), SubmaxError> {
        let Some(gain) = self.marginal_gain(x)? else {
            return Ok(());
        };
        if gain >= self.threshold {
            self.commit(x, id, gain)?;
        }
        Ok(())
    }
}
