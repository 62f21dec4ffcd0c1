//! Batch optimal-play simulation
//!
//! Runs many independent capped-Kelly games across scoped worker threads and
//! aggregates them into a baseline players can be compared against.

use crate::config::GameConfig;
use crate::errors::{EngineError, EngineResult};
use crate::games::{
    simulate_with_config, Money, OptimalPlayResult, OsEntropy, SeededEntropy, DEFAULT_MAX_STEPS,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Batch parameters
#[derive(Clone, Debug)]
pub struct BatchConfig {
    pub runs: usize,
    pub max_steps: u32,
    pub threads: usize,
    /// Seed for reproducible runs; OS entropy when unset
    pub seed: Option<u64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: 1_000,
            max_steps: DEFAULT_MAX_STEPS,
            threads: 4,
            seed: None,
        }
    }
}

/// Aggregated batch results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub runs: usize,
    pub targets_reached: usize,
    pub success_rate: f64,
    pub mean_final_balance: Money,
    pub mean_steps: f64,
    pub best_final_balance: Money,
    pub worst_final_balance: Money,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Run `batch.runs` simulations split across `batch.threads` workers.
///
/// With a seed, run `i` always draws from `SeededEntropy::new(seed + i)`, so
/// the report does not depend on the thread count.
pub fn simulate_batch(
    config: &GameConfig,
    batch: &BatchConfig,
) -> EngineResult<SimulationReport> {
    config.validate()?;
    let started = Instant::now();
    let threads = batch.threads.clamp(1, batch.runs.max(1));

    let per_worker: Vec<EngineResult<Vec<OptimalPlayResult>>> = crossbeam::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                scope.spawn(move |_| {
                    (worker..batch.runs)
                        .step_by(threads)
                        .map(|run| match batch.seed {
                            Some(seed) => {
                                let seed = seed.wrapping_add(run as u64);
                                let mut source = SeededEntropy::new(seed);
                                simulate_with_config(config, batch.max_steps, &mut source)
                            }
                            None => {
                                simulate_with_config(config, batch.max_steps, &mut OsEntropy)
                            }
                        })
                        .collect::<EngineResult<Vec<_>>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    Err(EngineError::WorkerFailed("worker thread panicked".to_string()))
                })
            })
            .collect()
    })
    .map_err(|_| EngineError::WorkerFailed("simulation scope panicked".to_string()))?;

    let mut results = Vec::with_capacity(batch.runs);
    for worker_results in per_worker {
        results.extend(worker_results?);
    }

    let report = aggregate(&results, started.elapsed());
    tracing::info!(
        "Simulated {} runs on {} threads: {:.1}% reached target in {:?}",
        report.runs,
        threads,
        report.success_rate,
        report.elapsed
    );

    Ok(report)
}

fn aggregate(results: &[OptimalPlayResult], elapsed: Duration) -> SimulationReport {
    let runs = results.len();
    if runs == 0 {
        return SimulationReport {
            runs: 0,
            targets_reached: 0,
            success_rate: 0.0,
            mean_final_balance: Decimal::ZERO,
            mean_steps: 0.0,
            best_final_balance: Decimal::ZERO,
            worst_final_balance: Decimal::ZERO,
            elapsed,
        };
    }

    let targets_reached = results.iter().filter(|r| r.reached_target).count();
    let total_balance: Money = results.iter().map(|r| r.final_balance).sum();
    let total_steps: u64 = results.iter().map(|r| r.steps_used as u64).sum();

    SimulationReport {
        runs,
        targets_reached,
        success_rate: targets_reached as f64 / runs as f64 * 100.0,
        mean_final_balance: (total_balance / Decimal::from(runs)).round_dp(2),
        mean_steps: total_steps as f64 / runs as f64,
        best_final_balance: results.iter().map(|r| r.final_balance).max().unwrap_or_default(),
        worst_final_balance: results.iter().map(|r| r.final_balance).min().unwrap_or_default(),
        elapsed,
    }
}
