// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use serde::Serialize;
use std::borrow::Cow;
use std::time::Instant;
use submax_core::{Diagnostics, RbfKernel, SubmaxError, SubmodularOptimizer};
use submax_objectives::FastIvm;
use submax_offline::{Greedy, Random};
use submax_streaming::{SieveStreaming, SieveStreamingPp};

/// Benchmark parameters for one driver invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkConfig {
    /// Cardinality budget.
    pub k: usize,
    /// IVM regularization sigma.
    pub sigma: f64,
    /// RBF kernel sigma; `None` resolves to `sqrt(d)` at run time.
    pub kernel_sigma: Option<f64>,
    /// RBF kernel scale.
    pub kernel_scale: f64,
    /// Upper bound on the best singleton value for the streaming optimizers.
    pub singleton_bound: f64,
    /// One SieveStreaming and one SieveStreaming++ run per epsilon.
    pub epsilons: Vec<f64>,
    /// Seed for the random baseline.
    pub seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            k: 5,
            sigma: 1.0,
            kernel_sigma: None,
            kernel_scale: 1.0,
            singleton_bound: 1.0,
            epsilons: vec![0.01, 0.02, 0.05, 0.1],
            seed: 0,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), SubmaxError> {
        if self.k == 0 {
            return Err(SubmaxError::invalid_input(
                "BenchmarkConfig.k must be >= 1; got 0",
            ));
        }
        if self.epsilons.is_empty() {
            return Err(SubmaxError::invalid_input(
                "BenchmarkConfig.epsilons must not be empty",
            ));
        }
        for &epsilon in &self.epsilons {
            if !epsilon.is_finite() || epsilon <= 0.0 {
                return Err(SubmaxError::invalid_input(format!(
                    "BenchmarkConfig epsilon values must be finite and > 0; got {epsilon}"
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of a single optimizer run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    pub selected_ids: Vec<u64>,
    #[serde(flatten)]
    pub diagnostics: Diagnostics,
}

/// Full benchmark document emitted by the driver.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub n: usize,
    pub d: usize,
    pub k: usize,
    pub kernel_sigma: f64,
    pub sigma: f64,
    pub warnings: Vec<String>,
    pub runs: Vec<RunReport>,
}

fn evaluate(
    algorithm: &'static str,
    epsilon: Option<f64>,
    opt: &mut dyn SubmodularOptimizer,
    items: &[Vec<f64>],
    ids: &[u64],
) -> Result<RunReport, SubmaxError> {
    let started_at = Instant::now();
    opt.fit(items, Some(ids))?;
    let runtime_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut notes = vec![];
    if let Some(epsilon) = epsilon {
        notes.push(format!("epsilon={epsilon}"));
    }

    Ok(RunReport {
        epsilon,
        selected_ids: opt.ids().to_vec(),
        diagnostics: Diagnostics {
            n_items: items.len(),
            d: items.first().map_or(0, Vec::len),
            algorithm: Cow::Borrowed(algorithm),
            runtime_ms: Some(runtime_ms),
            fval: opt.fval(),
            num_candidate_solutions: opt.num_candidate_solutions(),
            num_elements_stored: opt.num_elements_stored(),
            notes,
            warnings: vec![],
        },
    })
}

/// Runs every optimizer over the dataset, each with a fresh incremental
/// objective, and collects the per-run measurements.
pub fn run_benchmark(
    items: &[Vec<f64>],
    warnings: Vec<String>,
    config: &BenchmarkConfig,
) -> Result<BenchmarkReport, SubmaxError> {
    config.validate()?;
    if items.is_empty() {
        return Err(SubmaxError::invalid_input(
            "benchmark dataset must contain at least one row",
        ));
    }

    let d = items[0].len();
    let kernel_sigma = config.kernel_sigma.unwrap_or_else(|| (d as f64).sqrt());
    let kernel = RbfKernel::new(kernel_sigma, config.kernel_scale)?;
    let ids: Vec<u64> = (0..items.len() as u64).collect();

    let objective = || FastIvm::new(config.k, kernel, config.sigma);

    let mut runs = vec![];

    let mut greedy = Greedy::new(config.k, objective()?)?;
    runs.push(evaluate("greedy", None, &mut greedy, items, &ids)?);

    let mut random = Random::new(config.k, objective()?, config.seed)?;
    runs.push(evaluate("random", None, &mut random, items, &ids)?);

    for &epsilon in &config.epsilons {
        let mut sieve =
            SieveStreaming::new(config.k, objective()?, config.singleton_bound, epsilon)?;
        runs.push(evaluate(
            "sieve-streaming",
            Some(epsilon),
            &mut sieve,
            items,
            &ids,
        )?);

        let mut sieve_pp =
            SieveStreamingPp::new(config.k, objective()?, config.singleton_bound, epsilon)?;
        runs.push(evaluate(
            "sieve-streaming-pp",
            Some(epsilon),
            &mut sieve_pp,
            items,
            &ids,
        )?);
    }

    Ok(BenchmarkReport {
        n: items.len(),
        d,
        k: config.k,
        kernel_sigma,
        sigma: config.sigma,
        warnings,
        runs,
    })
}

/// CLI namespace.
pub fn crate_name() -> &'static str {
    let _ = (
        submax_core::crate_name(),
        submax_objectives::crate_name(),
        submax_offline::crate_name(),
        submax_streaming::crate_name(),
    );
    "submax-cli"
}
