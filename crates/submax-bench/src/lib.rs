// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use submax_core::StableRng;

/// Deterministic point cloud shared by the benchmarks.
pub fn generate_points(n: usize, d: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StableRng::new(seed);
    (0..n)
        .map(|_| {
            (0..d)
                .map(|_| rng.next_u64() as f64 / u64::MAX as f64)
                .collect()
        })
        .collect()
}

/// Bench namespace placeholder.
pub fn crate_name() -> &'static str {
    "submax-bench"
}
