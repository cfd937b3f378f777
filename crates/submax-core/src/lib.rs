// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod diagnostics;
pub mod error;
pub mod function;
pub mod kernel;
pub mod matrix;
pub mod optimizer;
pub mod rng;

pub use diagnostics::Diagnostics;
pub use error::SubmaxError;
pub use function::{ClosureObjective, SubmodularFunction};
pub use kernel::{ClosureKernel, Kernel, RbfKernel};
pub use matrix::{SymmetricMatrix, log_det_from_cholesky};
pub use optimizer::{OptimizerState, SubmodularOptimizer, validate_budget};
pub use rng::StableRng;

/// Core shared types and numeric primitives for submax.
pub fn crate_name() -> &'static str {
    "submax-core"
}
