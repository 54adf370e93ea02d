//! Adaptive large neighborhood search driver.

use crate::destroy::{Destroy, DestroyOperator};
use crate::fleet::FleetManager;
use crate::repair::{GreedyInsertion, Repair, RepairOperator};
use rand::Rng;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use u_loading_core::{random::create_rng, Node, Solution, SolverConfig};

/// Reward added to a repair operator's score when it produces a new
/// global best.
const NEW_BEST_REWARD: f64 = 10.0;

/// Result of an ALNS run.
#[derive(Debug, Clone)]
pub struct AlnsResult {
    /// The returned solution: the best covering solution when one was
    /// found, otherwise the best ever seen.
    pub best: Solution,

    /// Objective value of `best`.
    pub best_cost: f64,

    /// Iterations performed.
    pub iterations: usize,

    /// Number of new global bests found.
    pub improvements: usize,

    /// Final annealing temperature.
    pub final_temperature: f64,

    /// Set when no solution covering every customer was ever seen;
    /// `best` then leaves some customers unserved.
    pub coverage_incomplete: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Wall-clock time spent.
    pub elapsed: Duration,

    /// Final repair-operator scores, by operator name.
    pub repair_scores: Vec<(String, f64)>,

    /// Best objective sampled every `segment_size` iterations.
    pub cost_history: Vec<f64>,
}

/// Selects an index by roulette wheel over `scores`.
///
/// Probabilities are proportional to scores; a zero total falls back to
/// a uniform draw.
fn roulette_select<R: Rng>(scores: &[f64], rng: &mut R) -> usize {
    let total: f64 = scores.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..scores.len());
    }

    let mut roll = rng.random_range(0.0..total);
    for (i, score) in scores.iter().enumerate() {
        roll -= score;
        if roll <= 0.0 {
            return i;
        }
    }
    scores.len() - 1
}

/// Executes the ALNS loop: destroy, repair, annealed acceptance, and
/// score-adaptive repair-operator selection.
///
/// The search is reproducible: all randomness flows through one seeded
/// stream, and the packer underneath is deterministic with or without
/// its cache.
pub struct AlnsRunner {
    config: SolverConfig,
    cancelled: Arc<AtomicBool>,
}

impl AlnsRunner {
    /// Creates a runner.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle that cancels the run between iterations.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Runs the search with the configured (or a fresh) seed.
    pub fn run(
        &self,
        fleet: &FleetManager,
        start: &Arc<Node>,
        end: &Arc<Node>,
        customers: &[Arc<Node>],
    ) -> AlnsResult {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        self.run_with_rng(fleet, start, end, customers, &mut rng)
    }

    /// Runs the search against a caller-provided RNG.
    pub fn run_with_rng<R: Rng>(
        &self,
        fleet: &FleetManager,
        start: &Arc<Node>,
        end: &Arc<Node>,
        customers: &[Arc<Node>],
        rng: &mut R,
    ) -> AlnsResult {
        let timer = Instant::now();
        let config = &self.config;

        let destroy_ops = Destroy::standard();
        let repair_ops = Repair::standard();
        let mut scores = vec![1.0; repair_ops.len()];

        // Initial solution: greedy insertion of every customer.
        let mut current = Solution::new(start.clone(), end.clone());
        GreedyInsertion.repair(&mut current, customers.to_vec(), fleet, rng);
        let mut current_cost = current.objective(config);

        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut best_covering: Option<(Solution, f64)> = if current.covers(customers) {
            Some((current.clone(), current_cost))
        } else {
            None
        };

        log::info!(
            "initial solution: {} routes, cost {:.2}",
            current.routes().len(),
            current_cost
        );

        let mut temperature = config.start_temp;
        let mut improvements = 0usize;
        let mut iterations = 0usize;
        let mut cancelled = false;
        let mut cost_history = vec![best_cost];

        for iteration in 0..config.max_iterations {
            if self.cancelled.load(AtomicOrdering::Relaxed) {
                cancelled = true;
                break;
            }
            if timer.elapsed() >= config.max_runtime {
                log::info!("runtime budget reached after {} iterations", iteration);
                break;
            }
            iterations = iteration + 1;

            // Repair selection adapts to scores; destroy is uniform.
            let r_idx = roulette_select(&scores, rng);
            let d_idx = rng.random_range(0..destroy_ops.len());

            let (mut candidate, removed) = destroy_ops[d_idx].destroy(&current, fleet, rng);
            repair_ops[r_idx].repair(&mut candidate, removed, fleet, rng);
            let candidate_cost = candidate.objective(config);

            let delta = candidate_cost - current_cost;
            let accept = delta < 0.0 || rng.random::<f64>() < (-delta / temperature).exp();
            if accept {
                current = candidate.clone();
                current_cost = candidate_cost;
            }

            if candidate_cost < best_cost {
                best = candidate.clone();
                best_cost = candidate_cost;
                improvements += 1;
                scores[r_idx] += NEW_BEST_REWARD;
            }

            if candidate.covers(customers) {
                let covering_improves = match &best_covering {
                    None => true,
                    Some((_, cost)) => candidate_cost < *cost,
                };
                if covering_improves {
                    best_covering = Some((candidate, candidate_cost));
                }
            }

            temperature *= config.cooling_rate;

            if (iteration + 1) % config.segment_size == 0 {
                cost_history.push(best_cost);
            }
        }

        let repair_scores = repair_ops
            .iter()
            .zip(&scores)
            .map(|(op, &s)| (op.name().to_string(), s))
            .collect();

        // Never return a non-covering solution while a covering one
        // exists, even if the non-covering one scored better.
        let (best, best_cost, coverage_incomplete) = match best_covering {
            Some((solution, cost)) => (solution, cost, false),
            None => {
                log::warn!("no all-covering solution found; returning best effort");
                (best, best_cost, true)
            }
        };

        AlnsResult {
            best,
            best_cost,
            iterations,
            improvements,
            final_temperature: temperature,
            coverage_incomplete,
            cancelled,
            elapsed: timer.elapsed(),
            repair_scores,
            cost_history,
        }
    }

    /// Runs `restarts` independent searches in parallel and returns the
    /// best outcome.
    ///
    /// Restart `i` uses seed `base_seed + i` and its own clone of the
    /// fleet manager, so packer caches are never shared across threads
    /// and each restart is individually reproducible.
    pub fn run_parallel(
        &self,
        fleet: &FleetManager,
        start: &Arc<Node>,
        end: &Arc<Node>,
        customers: &[Arc<Node>],
        restarts: usize,
    ) -> AlnsResult {
        let restarts = restarts.max(1);
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        let workers: Vec<(u64, FleetManager)> = (0..restarts as u64)
            .map(|i| (base_seed.wrapping_add(i), fleet.clone()))
            .collect();

        let results: Vec<AlnsResult> = workers
            .into_par_iter()
            .map(|(seed, worker_fleet)| {
                let mut rng = create_rng(seed);
                self.run_with_rng(&worker_fleet, start, end, customers, &mut rng)
            })
            .collect();

        results
            .into_iter()
            .min_by(|a, b| {
                // Covering results beat non-covering ones outright.
                (a.coverage_incomplete, a.best_cost)
                    .partial_cmp(&(b.coverage_incomplete, b.best_cost))
                    .unwrap_or(Ordering::Equal)
            })
            .expect("at least one restart result")
    }
}
