// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod greedy;
pub mod random;

pub use greedy::Greedy;
pub use random::Random;

/// Offline optimizer namespace.
pub fn crate_name() -> &'static str {
    let _ = submax_core::crate_name();
    "submax-offline"
}
