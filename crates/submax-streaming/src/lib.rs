// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

mod sieve;
pub mod sieve_streaming;
pub mod sieve_streaming_pp;
pub mod thresholds;

pub use sieve_streaming::SieveStreaming;
pub use sieve_streaming_pp::SieveStreamingPp;
pub use thresholds::thresholds;

/// Streaming optimizer namespace.
pub fn crate_name() -> &'static str {
    let _ = submax_core::crate_name();
    "submax-streaming"
}
