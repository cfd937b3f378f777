// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use submax_core::{RbfKernel, SubmodularFunction, SubmodularOptimizer};
use submax_objectives::{FastIvm, Ivm};
use submax_offline::{Greedy, Random};

const MIN_PROPTEST_CASES: u32 = 1000;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn chunk_points(values: &[f64], d: usize) -> Vec<Vec<f64>> {
    values.chunks_exact(d).map(<[f64]>::to_vec).collect()
}

/// Exhaustive optimum over all subsets of size at most `k`, in index order.
fn brute_force_opt(items: &[Vec<f64>], k: usize, f: &Ivm) -> f64 {
    let n = items.len();
    assert!(n <= 16, "exhaustive search is only meant for tiny inputs");

    let mut best = 0.0_f64;
    for mask in 0u32..(1 << n) {
        if mask.count_ones() as usize > k {
            continue;
        }
        let subset: Vec<Vec<f64>> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| items[i].clone())
            .collect();
        let value = f.eval(&subset);
        if value.is_finite() && value > best {
            best = value;
        }
    }
    best
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        max_shrink_iters: 1024,
        failure_persistence: Some(Box::new(FileFailurePersistence::Off)),
        .. ProptestConfig::default()
    })]

    /// Greedy is within `1 - 1/e` of the exhaustive optimum on tiny inputs.
    #[test]
    fn greedy_meets_the_approximation_guarantee(
        values in prop::collection::vec(-4.0f64..4.0, 16),
        n in 2usize..=8,
        k in 1usize..=4,
        kernel_sigma in 0.5f64..4.0,
    ) {
        let points = chunk_points(&values[..n * 2], 2);
        let kernel = RbfKernel::new(kernel_sigma, 1.0).expect("valid parameters");
        let reference = Ivm::new(kernel, 1.0).expect("valid");
        let opt = brute_force_opt(&points, k, &reference);

        let mut greedy = Greedy::new(k, FastIvm::new(k, kernel, 1.0).expect("valid"))
            .expect("valid");
        greedy.fit(&points, None).expect("fit succeeds");

        let ratio = 1.0 - (-1.0_f64).exp();
        prop_assert!(
            greedy.fval() >= ratio * opt - 1e-9,
            "greedy fval {} below {} * OPT (OPT = {})", greedy.fval(), ratio, opt
        );
    }

    /// I1-I3: budget, id alignment, and fval consistency after fit.
    #[test]
    fn greedy_invariants_hold_after_fit(
        values in prop::collection::vec(-4.0f64..4.0, 24),
        k in 1usize..=5,
        kernel_sigma in 0.5f64..4.0,
    ) {
        let points = chunk_points(&values, 2);
        let ids: Vec<u64> = (0..points.len() as u64).map(|i| 100 + i).collect();
        let kernel = RbfKernel::new(kernel_sigma, 1.0).expect("valid parameters");

        let mut greedy = Greedy::new(k, FastIvm::new(k, kernel, 1.0).expect("valid"))
            .expect("valid");
        greedy.fit(&points, Some(&ids)).expect("fit succeeds");

        prop_assert!(greedy.solution().len() <= k);
        prop_assert_eq!(greedy.ids().len(), greedy.solution().len());
        for id in greedy.ids() {
            prop_assert!(ids.contains(id));
        }

        let reference = Ivm::new(kernel, 1.0).expect("valid");
        let expected = reference.eval(greedy.solution());
        prop_assert!(
            (greedy.fval() - expected).abs() <= 1e-9,
            "fval {} disagrees with f(solution) {}", greedy.fval(), expected
        );
    }

    /// The random baseline is reproducible and never exceeds the budget.
    #[test]
    fn random_baseline_is_deterministic_per_seed(
        values in prop::collection::vec(-4.0f64..4.0, 24),
        k in 1usize..=6,
        seed in any::<u64>(),
    ) {
        let points = chunk_points(&values, 2);
        let ids: Vec<u64> = (0..points.len() as u64).collect();
        let kernel = RbfKernel::new(2.0, 1.0).expect("valid parameters");

        let mut first = Random::new(k, FastIvm::new(k, kernel, 1.0).expect("valid"), seed)
            .expect("valid");
        first.fit(&points, Some(&ids)).expect("fit succeeds");
        let mut second = Random::new(k, FastIvm::new(k, kernel, 1.0).expect("valid"), seed)
            .expect("valid");
        second.fit(&points, Some(&ids)).expect("fit succeeds");

        prop_assert_eq!(first.ids(), second.ids());
        prop_assert!(first.solution().len() <= k.min(points.len()));
        prop_assert_eq!(first.ids().len(), first.solution().len());

        let mut sorted = first.ids().to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), first.ids().len(), "ids must be distinct");
    }

    /// No feasible selection, random included, exceeds the exhaustive optimum.
    #[test]
    fn random_baseline_never_exceeds_the_exhaustive_optimum(
        values in prop::collection::vec(-4.0f64..4.0, 16),
        n in 2usize..=8,
        k in 1usize..=4,
        seed in any::<u64>(),
    ) {
        let points = chunk_points(&values[..n * 2], 2);
        let kernel = RbfKernel::new(2.0, 1.0).expect("valid parameters");
        let reference = Ivm::new(kernel, 1.0).expect("valid");
        let opt = brute_force_opt(&points, k, &reference);

        let mut random = Random::new(k, FastIvm::new(k, kernel, 1.0).expect("valid"), seed)
            .expect("valid");
        random.fit(&points, None).expect("fit succeeds");

        prop_assert!(
            random.fval() <= opt + 1e-9,
            "random fval {} exceeds OPT {}", random.fval(), opt
        );
    }
}
