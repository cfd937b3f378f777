// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod fast_ivm;
mod gram;
pub mod ivm;

pub use fast_ivm::FastIvm;
pub use ivm::Ivm;

/// Submodular objectives namespace.
pub fn crate_name() -> &'static str {
    let _ = submax_core::crate_name();
    "submax-objectives"
}
