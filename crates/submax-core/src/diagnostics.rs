// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::borrow::Cow;

/// Per-run diagnostics assembled by drivers.
///
/// Optimizers expose counters through their accessors; drivers collect them
/// here together with timing and free-form notes, and serialize the record
/// when the `serde` feature is enabled.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    /// Number of items fed to the optimizer.
    pub n_items: usize,
    /// Dimensionality of the items.
    pub d: usize,
    /// Optimizer label, e.g. `"greedy"` or `"sieve-streaming"`.
    pub algorithm: Cow<'static, str>,
    /// Wall-clock runtime of the fit, when measured.
    pub runtime_ms: Option<u64>,
    /// Final objective value.
    pub fval: f64,
    /// Candidate solutions maintained (sieves; 1 for plain optimizers).
    pub num_candidate_solutions: usize,
    /// Elements held across all candidate solutions.
    pub num_elements_stored: usize,
    /// Free-form machine-readable notes (`key=value` strings).
    pub notes: Vec<String>,
    /// Human-readable warnings, e.g. dropped input rows.
    pub warnings: Vec<String>,
}
