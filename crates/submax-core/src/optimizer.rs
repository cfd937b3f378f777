// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::SubmaxError;

/// Validates a cardinality budget at construction time.
pub fn validate_budget(k: usize) -> Result<(), SubmaxError> {
    if k == 0 {
        return Err(SubmaxError::invalid_input(
            "cardinality budget K must be >= 1; got 0",
        ));
    }
    Ok(())
}

/// Solution state shared by every optimizer.
///
/// `solution` and `ids` are index-aligned; insertion order is meaningful (it
/// is the row order of any incrementally maintained factorization). Before
/// the first successful `fit`/`next`, accessors expose this zero state
/// rather than an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptimizerState {
    pub solution: Vec<Vec<f64>>,
    pub ids: Vec<u64>,
    pub fval: f64,
    pub is_fitted: bool,
}

impl OptimizerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a committed element and its caller id, if one was supplied.
    pub fn push(&mut self, x: &[f64], id: Option<u64>) {
        self.solution.push(x.to_vec());
        if let Some(id) = id {
            self.ids.push(id);
        }
    }
}

/// Common contract of all submodular optimizers.
///
/// Offline optimizers consume the whole dataset through [`fit`]; streaming
/// optimizers take one element at a time through [`next`]. The default
/// `fit` streams the items through `next` in call order, which is exactly
/// the observable semantics required of streaming optimizers.
///
/// [`fit`]: SubmodularOptimizer::fit
/// [`next`]: SubmodularOptimizer::next
pub trait SubmodularOptimizer {
    /// Offline pass over the full dataset.
    ///
    /// When `ids` is supplied, `ids[i]` is the caller's identifier for
    /// `items[i]` and selected elements record the caller's id; when omitted
    /// the id list stays empty.
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
        for (i, x) in items.iter().enumerate() {
            self.next(x, ids.map(|ids| ids[i]))?;
        }
        Ok(())
    }

    /// Streaming step: considers one element.
    fn next(&mut self, x: &[f64], id: Option<u64>) -> Result<(), SubmaxError>;

    /// Read-only view of the current best solution.
    fn solution(&self) -> &[Vec<f64>];

    /// Caller ids aligned with [`SubmodularOptimizer::solution`].
    fn ids(&self) -> &[u64];

    /// Objective value of the current best solution.
    fn fval(&self) -> f64;

    /// True once any `fit`/`next` call has completed.
    fn is_fitted(&self) -> bool;

    /// Number of candidate solutions maintained internally (sieves).
    fn num_candidate_solutions(&self) -> usize {
        1
    }

    /// Total number of elements held across all candidate solutions.
    fn num_elements_stored(&self) -> usize {
        self.solution().len()
    }
}
