// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use submax_core::{RbfKernel, StableRng, SubmodularFunction, SubmodularOptimizer};
use submax_objectives::{FastIvm, Ivm};
use submax_offline::Greedy;
use submax_streaming::{SieveStreaming, SieveStreamingPp};

const N: usize = 100;
const D: usize = 5;
const K: usize = 5;
const EPSILON: f64 = 0.1;
const SINGLETON_BOUND: f64 = 1.0;

/// Deterministic point cloud in `[0, 1]^5`.
fn random_points() -> Vec<Vec<f64>> {
    let mut rng = StableRng::new(0x5eed);
    (0..N)
        .map(|_| {
            (0..D)
                .map(|_| rng.next_u64() as f64 / u64::MAX as f64)
                .collect()
        })
        .collect()
}

fn kernel() -> RbfKernel {
    RbfKernel::new((D as f64).sqrt(), 1.0).expect("valid parameters")
}

fn objective() -> FastIvm {
    FastIvm::new(K, kernel(), 1.0).expect("valid")
}

fn fitted_greedy(points: &[Vec<f64>], ids: &[u64]) -> Greedy {
    let mut greedy = Greedy::new(K, objective()).expect("valid");
    greedy.fit(points, Some(ids)).expect("greedy fit succeeds");
    greedy
}

fn fitted_sieve_streaming(points: &[Vec<f64>], ids: &[u64]) -> SieveStreaming {
    let mut sieve = SieveStreaming::new(K, objective(), SINGLETON_BOUND, EPSILON).expect("valid");
    sieve.fit(points, Some(ids)).expect("sieve fit succeeds");
    sieve
}

fn fitted_sieve_streaming_pp(points: &[Vec<f64>], ids: &[u64]) -> SieveStreamingPp {
    let mut sieve = SieveStreamingPp::new(K, objective(), SINGLETON_BOUND, EPSILON).expect("valid");
    sieve.fit(points, Some(ids)).expect("sieve++ fit succeeds");
    sieve
}

fn ids() -> Vec<u64> {
    (0..N as u64).collect()
}

#[test]
fn sieve_streaming_reaches_the_streaming_guarantee_against_greedy() {
    let points = random_points();
    let ids = ids();
    let greedy = fitted_greedy(&points, &ids);
    let sieve = fitted_sieve_streaming(&points, &ids);

    assert!(greedy.fval() > 0.0);
    // 1/2 - epsilon = 0.4 at epsilon = 0.1.
    assert!(
        sieve.fval() >= 0.4 * greedy.fval(),
        "sieve fval {} below 0.4 * greedy fval {}",
        sieve.fval(),
        greedy.fval()
    );
}

#[test]
fn sieve_streaming_pp_reaches_the_streaming_guarantee_against_greedy() {
    let points = random_points();
    let ids = ids();
    let greedy = fitted_greedy(&points, &ids);
    let sieve = fitted_sieve_streaming_pp(&points, &ids);

    assert!(
        sieve.fval() >= 0.4 * greedy.fval(),
        "sieve++ fval {} below 0.4 * greedy fval {}",
        sieve.fval(),
        greedy.fval()
    );
}

#[test]
fn sieve_streaming_pp_stores_no_more_elements_than_sieve_streaming() {
    let points = random_points();
    let ids = ids();
    let sieve = fitted_sieve_streaming(&points, &ids);
    let sieve_pp = fitted_sieve_streaming_pp(&points, &ids);

    assert!(sieve.num_elements_stored() > 0);
    assert!(
        sieve_pp.num_elements_stored() <= sieve.num_elements_stored(),
        "sieve++ stored {} elements, sieve stored {}",
        sieve_pp.num_elements_stored(),
        sieve.num_elements_stored()
    );
}

#[test]
fn budgets_and_id_alignment_hold_for_both_streaming_optimizers() {
    let points = random_points();
    let ids = ids();

    let sieve = fitted_sieve_streaming(&points, &ids);
    assert!(sieve.solution().len() <= K);
    assert_eq!(sieve.ids().len(), sieve.solution().len());
    for id in sieve.ids() {
        assert!((*id as usize) < N);
    }

    let sieve_pp = fitted_sieve_streaming_pp(&points, &ids);
    assert!(sieve_pp.solution().len() <= K);
    assert_eq!(sieve_pp.ids().len(), sieve_pp.solution().len());
}

#[test]
fn promoted_fval_matches_the_objective_on_the_promoted_solution() {
    let points = random_points();
    let ids = ids();
    let reference = Ivm::new(kernel(), 1.0).expect("valid");

    let sieve = fitted_sieve_streaming(&points, &ids);
    let expected = reference.eval(sieve.solution());
    assert!(
        (sieve.fval() - expected).abs() <= 1e-9,
        "sieve fval {} disagrees with f(solution) {expected}",
        sieve.fval()
    );

    let sieve_pp = fitted_sieve_streaming_pp(&points, &ids);
    let expected = reference.eval(sieve_pp.solution());
    assert!(
        (sieve_pp.fval() - expected).abs() <= 1e-9,
        "sieve++ fval {} disagrees with f(solution) {expected}",
        sieve_pp.fval()
    );
}

#[test]
fn promoted_solutions_reproduce_their_ids_from_the_stream() {
    let points = random_points();
    let ids = ids();
    let sieve = fitted_sieve_streaming(&points, &ids);

    // Each promoted id must point at the element actually stored.
    for (id, stored) in sieve.ids().iter().zip(sieve.solution()) {
        assert_eq!(&points[*id as usize], stored);
    }
}

#[test]
fn streaming_order_is_the_processing_order() {
    let points = random_points();
    let ids = ids();
    let mut sieve = SieveStreaming::new(K, objective(), SINGLETON_BOUND, EPSILON).expect("valid");
    for (x, id) in points.iter().zip(&ids) {
        sieve.next(x, Some(*id)).expect("next succeeds");
        assert!(sieve.solution().len() <= K);
        assert!(sieve.is_fitted());
    }

    let refitted = fitted_sieve_streaming(&points, &ids);
    assert_eq!(sieve.fval(), refitted.fval());
    assert_eq!(sieve.ids(), refitted.ids());
}
