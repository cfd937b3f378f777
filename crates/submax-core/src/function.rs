// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::SubmaxError;
use std::sync::Arc;

/// Contract every submodular objective implements.
///
/// The optimizers drive objectives through exactly four operations: `eval`
/// for exact values, `peek` to probe a hypothetical placement, `update` to
/// commit it, and `clone_box` so that parallel candidate solutions (the
/// sieves of the streaming optimizers) each own an independent stateful
/// instance. `peek` must be side-effect-free with respect to anything a
/// later `peek` or `eval` observes; per-instance scratch buffers are fine.
pub trait SubmodularFunction: Send {
    /// Exact objective value of the ordered solution.
    fn eval(&self, solution: &[Vec<f64>]) -> f64;

    /// Value if `x` were placed at `pos`: appended when `pos >= |solution|`,
    /// replacing the element at `pos` otherwise.
    ///
    /// A `NonSpd` error marks the candidate as ineligible (it would make the
    /// maintained matrix singular); optimizers skip it and continue.
    fn peek(
        &mut self,
        solution: &[Vec<f64>],
        x: &[f64],
        pos: usize,
    ) -> Result<f64, SubmaxError>;

    /// Commits the placement probed by `peek` with the same arguments.
    fn update(
        &mut self,
        solution: &[Vec<f64>],
        x: &[f64],
        pos: usize,
    ) -> Result<(), SubmaxError>;

    /// Deep copy; the clone shares no mutable state with `self`.
    fn clone_box(&self) -> Box<dyn SubmodularFunction>;
}

impl Clone for Box<dyn SubmodularFunction> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Adapts a stateless closure to the [`SubmodularFunction`] trait.
///
/// `peek` copies the solution, applies the append-or-replace placement, and
/// evaluates the closure; `update` has nothing to commit. Clones share the
/// underlying closure, which is only sound for stateless closures; stateful
/// objectives implement the trait directly instead.
#[derive(Clone)]
pub struct ClosureObjective {
    f: Arc<dyn Fn(&[Vec<f64>]) -> f64 + Send + Sync>,
}

impl ClosureObjective {
    pub fn new(f: impl Fn(&[Vec<f64>]) -> f64 + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl SubmodularFunction for ClosureObjective {
    fn eval(&self, solution: &[Vec<f64>]) -> f64 {
        (self.f)(solution)
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
        Ok((self.f)(&hypothetical))
    }

    fn update(
        &mut self,
        _solution: &[Vec<f64>],
        _x: &[f64],
        _pos: usize,
    ) -> Result<(), SubmaxError> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn SubmodularFunction> {
        Box::new(self.clone())
    }
}

impl std::fmt::Debug for ClosureObjective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureObjective").finish_non_exhaustive()
    }
}
