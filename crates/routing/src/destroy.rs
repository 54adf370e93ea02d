//! Destroy operators for the ALNS search.
//!
//! Each operator copies the incoming solution (routes are shared, so the
//! copy is shallow), removes a batch of customers, and rebuilds the
//! touched routes through the fleet manager. The removed nodes are
//! handed to a repair operator afterwards.
//!
//! # Operators
//!
//! - [`RandomRemoval`] — uniform removal, keeps the search diverse
//! - [`WorstRemoval`] — removes the customers whose absence saves the
//!   most weighted cost
//! - [`ShawRemoval`] — removes clusters of related customers (near in
//!   distance, similar in cargo volume)

use crate::fleet::FleetManager;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use u_loading_core::{Node, Solution};

/// A destroy operator removes customers from a solution.
pub trait DestroyOperator {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Removes a batch of customers.
    ///
    /// Returns the shallow-copied, rebuilt solution and the removed
    /// nodes in removal order.
    fn destroy<R: Rng>(
        &self,
        solution: &Solution,
        fleet: &FleetManager,
        rng: &mut R,
    ) -> (Solution, Vec<Arc<Node>>);
}

/// Collects every customer stop across all routes, in route order.
fn collect_customers(solution: &Solution) -> Vec<Arc<Node>> {
    solution
        .routes()
        .iter()
        .flat_map(|r| r.customers().cloned())
        .collect()
}

/// Draws the removal batch size: uniform in `[1, max(1, total / 2)]`.
fn removal_count<R: Rng>(total: usize, rng: &mut R) -> usize {
    let upper = (total / 2).max(1);
    rng.random_range(1..=upper)
}

/// Samples `n` elements without replacement.
fn sample_without_replacement<R: Rng>(
    pool: &[Arc<Node>],
    n: usize,
    rng: &mut R,
) -> Vec<Arc<Node>> {
    let mut indices: Vec<usize> = (0..pool.len()).collect();
    indices.shuffle(rng);
    indices
        .into_iter()
        .take(n)
        .map(|i| pool[i].clone())
        .collect()
}

/// Excises the removed customers and re-binds every touched route.
///
/// Untouched routes are kept verbatim. A shortened route that no longer
/// packs (the packer is sequence-dependent, not monotone) is dropped and
/// its surviving customers join the removed set, so repair puts them
/// back and coverage is preserved.
pub(crate) fn rebuild(
    solution: &mut Solution,
    removed: &mut Vec<Arc<Node>>,
    fleet: &FleetManager,
) {
    let removed_ids: HashSet<usize> = removed.iter().map(|n| n.id()).collect();
    let mut rebuilt = Vec::with_capacity(solution.routes().len());

    for route in solution.routes() {
        if !route.customers().any(|n| removed_ids.contains(&n.id())) {
            rebuilt.push(route.clone());
            continue;
        }

        let shortened: Vec<Arc<Node>> = route
            .sequence()
            .iter()
            .filter(|n| n.is_depot() || !removed_ids.contains(&n.id()))
            .cloned()
            .collect();

        if shortened.len() <= 2 {
            continue;
        }

        match fleet.find_best_vehicle(&shortened) {
            Some(rebound) => rebuilt.push(rebound),
            None => {
                log::warn!(
                    "shortened route {} no longer packs; releasing its stops for reinsertion",
                    route.signature()
                );
                removed.extend(shortened.into_iter().filter(|n| !n.is_depot()));
            }
        }
    }

    solution.set_routes(rebuilt);
}

/// Removes customers uniformly at random.
pub struct RandomRemoval;

impl DestroyOperator for RandomRemoval {
    fn name(&self) -> &str {
        "random_removal"
    }

    fn destroy<R: Rng>(
        &self,
        solution: &Solution,
        fleet: &FleetManager,
        rng: &mut R,
    ) -> (Solution, Vec<Arc<Node>>) {
        let mut sol = solution.clone();
        let pool = collect_customers(&sol);
        if pool.is_empty() {
            return (sol, Vec::new());
        }

        let n = removal_count(pool.len(), rng);
        let mut removed = sample_without_replacement(&pool, n, rng);
        rebuild(&mut sol, &mut removed, fleet);
        (sol, removed)
    }
}

/// Removes the customers whose removal saves the most weighted cost.
///
/// For every stop the saving is `cost(route) - cost(route without it)`,
/// both terms of the objective included. To avoid the purely greedy
/// choice cycling, the batch is sampled from the top `2n` candidates.
pub struct WorstRemoval;

impl DestroyOperator for WorstRemoval {
    fn name(&self) -> &str {
        "worst_removal"
    }

    fn destroy<R: Rng>(
        &self,
        solution: &Solution,
        fleet: &FleetManager,
        rng: &mut R,
    ) -> (Solution, Vec<Arc<Node>>) {
        let mut sol = solution.clone();
        let config = fleet.config();

        let mut candidates: Vec<(Arc<Node>, f64)> = Vec::new();
        for route in sol.routes() {
            let full_cost = route.weighted_cost(config);
            for node in route.customers() {
                let shortened: Vec<Arc<Node>> = route
                    .sequence()
                    .iter()
                    .filter(|n| n.is_depot() || n.id() != node.id())
                    .cloned()
                    .collect();

                // A single-stop route disappears entirely with its stop.
                let saving = if shortened.len() <= 2 {
                    full_cost
                } else {
                    match fleet.find_best_vehicle(&shortened) {
                        Some(rebound) => full_cost - rebound.weighted_cost(config),
                        None => continue,
                    }
                };
                candidates.push((node.clone(), saving));
            }
        }

        if candidates.is_empty() {
            return (sol, Vec::new());
        }

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let n = removal_count(candidates.len(), rng);
        let limit = (2 * n).min(candidates.len());
        let top: Vec<Arc<Node>> = candidates[..limit].iter().map(|c| c.0.clone()).collect();
        let mut removed = sample_without_replacement(&top, n, rng);
        rebuild(&mut sol, &mut removed, fleet);
        (sol, removed)
    }
}

/// Removes a cluster of mutually related customers (Shaw, 1998).
///
/// Relatedness between a removed reference `r` and a candidate `t` is
/// `d(r, t) / d_max + |vol(r) - vol(t)| / vdiff_max`, lower meaning more
/// related. The normalizers are estimated from a random sample of up to
/// 50 stops. Selection is biased toward the most related candidate via
/// `floor(U^3 * len)`.
pub struct ShawRemoval;

impl DestroyOperator for ShawRemoval {
    fn name(&self) -> &str {
        "shaw_removal"
    }

    fn destroy<R: Rng>(
        &self,
        solution: &Solution,
        fleet: &FleetManager,
        rng: &mut R,
    ) -> (Solution, Vec<Arc<Node>>) {
        let mut sol = solution.clone();
        let pool = collect_customers(&sol);
        if pool.is_empty() {
            return (sol, Vec::new());
        }

        let n = removal_count(pool.len(), rng);

        // Normalizers from a bounded random sample.
        let sample = sample_without_replacement(&pool, pool.len().min(50), rng);
        let mut d_max: f64 = 0.0;
        let mut vdiff_max: f64 = 0.0;
        for i in 0..sample.len() {
            for j in (i + 1)..sample.len() {
                let d = fleet.distance(&sample[i], &sample[j]);
                if d.is_finite() {
                    d_max = d_max.max(d);
                }
                vdiff_max =
                    vdiff_max.max((sample[i].total_volume() - sample[j].total_volume()).abs());
            }
        }
        let d_max = if d_max > 0.0 { d_max } else { 1.0 };
        let vdiff_max = if vdiff_max > 0.0 { vdiff_max } else { 1.0 };

        let mut remaining = pool;
        let seed = remaining.remove(rng.random_range(0..remaining.len()));
        let mut removed = vec![seed];

        while removed.len() < n && !remaining.is_empty() {
            let reference = removed[rng.random_range(0..removed.len())].clone();

            let mut scored: Vec<(usize, f64)> = remaining
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let relatedness = fleet.distance(&reference, t) / d_max
                        + (reference.total_volume() - t.total_volume()).abs() / vdiff_max;
                    (i, relatedness)
                })
                .collect();
            scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

            let u: f64 = rng.random();
            let pick = ((u.powi(3) * scored.len() as f64).floor() as usize).min(scored.len() - 1);
            let idx = scored[pick].0;
            removed.push(remaining.remove(idx));
        }

        rebuild(&mut sol, &mut removed, fleet);
        (sol, removed)
    }
}

/// Enum dispatch over the destroy operator family.
pub enum Destroy {
    Random(RandomRemoval),
    Worst(WorstRemoval),
    Shaw(ShawRemoval),
}

impl Destroy {
    /// The standard operator set.
    pub fn standard() -> Vec<Destroy> {
        vec![
            Destroy::Random(RandomRemoval),
            Destroy::Worst(WorstRemoval),
            Destroy::Shaw(ShawRemoval),
        ]
    }
}

impl DestroyOperator for Destroy {
    fn name(&self) -> &str {
        match self {
            Destroy::Random(op) => op.name(),
            Destroy::Worst(op) => op.name(),
            Destroy::Shaw(op) => op.name(),
        }
    }

    fn destroy<R: Rng>(
        &self,
        solution: &Solution,
        fleet: &FleetManager,
        rng: &mut R,
    ) -> (Solution, Vec<Arc<Node>>) {
        match self {
            Destroy::Random(op) => op.destroy(solution, fleet, rng),
            Destroy::Worst(op) => op.destroy(solution, fleet, rng),
            Destroy::Shaw(op) => op.destroy(solution, fleet, rng),
        }
    }
}
