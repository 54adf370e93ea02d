//! Repair operators for the ALNS search.
//!
//! Repair operators take the nodes a destroy operator removed and work
//! them back into the solution, mutating it in place. Every candidate
//! move is validated end-to-end: the fleet manager packs the tentative
//! sequence before the move's cost is even considered, so repaired
//! solutions are always loadable.
//!
//! # Operators
//!
//! - [`GreedyInsertion`] — each node goes to its cheapest feasible spot
//! - [`Regret2Insertion`] — nodes with the most to lose go first

use crate::fleet::FleetManager;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::Arc;
use u_loading_core::{Node, Route, Solution, EPS};

/// A repair operator reinserts removed customers into a solution.
pub trait RepairOperator {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Reinserts `removed` into `solution` in place.
    ///
    /// Nodes with no feasible move anywhere (not even alone in the
    /// largest vehicle) are left unserved; the driver accounts for
    /// coverage separately.
    fn repair<R: Rng>(
        &self,
        solution: &mut Solution,
        removed: Vec<Arc<Node>>,
        fleet: &FleetManager,
        rng: &mut R,
    );
}

/// One feasible insertion, ready to apply.
#[derive(Debug, Clone)]
enum InsertionMove {
    /// Replace the route at `index` with the re-bound route.
    Replace { index: usize, route: Arc<Route> },
    /// Open a new single-stop route.
    Open { route: Arc<Route> },
}

#[derive(Debug, Clone)]
struct Candidate {
    mv: InsertionMove,
    delta: f64,
}

fn apply(solution: &mut Solution, candidate: Candidate) {
    match candidate.mv {
        InsertionMove::Replace { index, route } => solution.replace_route(index, route),
        InsertionMove::Open { route } => solution.push_route(route),
    }
}

/// Admissible insertion indices for `node` into `route`.
///
/// A bonded node may only sit at index 1, and never next to another
/// bonded customer. A non-bonded node must not displace a bonded
/// customer from index 1.
fn admissible_positions(route: &Route, node: &Node) -> std::ops::Range<usize> {
    let has_bonded = route.sequence().get(1).is_some_and(|n| n.is_bonded());
    if node.is_bonded() {
        if has_bonded {
            1..1
        } else {
            1..2
        }
    } else {
        let start = if has_bonded { 2 } else { 1 };
        start..route.sequence().len()
    }
}

/// 1D pre-prune: can `node` possibly join `route` in *any* vehicle?
///
/// Checks aggregate weight and volume against the largest catalog
/// vehicle before paying for insertion scans and packing.
fn possibly_fits(route: &Route, node: &Node, fleet: &FleetManager) -> bool {
    match fleet.largest_vehicle() {
        None => false,
        Some(vehicle) => {
            route.load().total_weight() + node.total_weight() <= vehicle.max_weight() + EPS
                && route.load().total_volume() + node.total_volume() <= vehicle.volume() + EPS
        }
    }
}

/// Enumerates every feasible insertion of `node`, including opening a
/// new route. Costs are weighted-objective deltas.
fn feasible_insertions(
    node: &Arc<Node>,
    solution: &Solution,
    fleet: &FleetManager,
) -> Vec<Candidate> {
    let config = fleet.config();
    let mut candidates = Vec::new();

    for (index, route) in solution.routes().iter().enumerate() {
        if !possibly_fits(route, node, fleet) {
            continue;
        }
        for pos in admissible_positions(route, node) {
            let mut sequence = route.sequence().to_vec();
            sequence.insert(pos, node.clone());
            if let Some(rebound) = fleet.find_best_vehicle(&sequence) {
                let delta = rebound.weighted_cost(config) - route.weighted_cost(config);
                candidates.push(Candidate {
                    mv: InsertionMove::Replace {
                        index,
                        route: rebound,
                    },
                    delta,
                });
            }
        }
    }

    let single = vec![
        solution.start().clone(),
        node.clone(),
        solution.end().clone(),
    ];
    if let Some(opened) = fleet.find_best_vehicle(&single) {
        let delta = opened.weighted_cost(config);
        candidates.push(Candidate {
            mv: InsertionMove::Open { route: opened },
            delta,
        });
    }

    candidates
}

/// Returns the cheapest feasible insertion of `node`, if any.
fn best_insertion(
    node: &Arc<Node>,
    solution: &Solution,
    fleet: &FleetManager,
) -> Option<Candidate> {
    feasible_insertions(node, solution, fleet)
        .into_iter()
        .min_by(|a, b| a.delta.partial_cmp(&b.delta).unwrap_or(Ordering::Equal))
}

/// Inserts each removed node at its cheapest feasible position, in
/// shuffled order.
pub struct GreedyInsertion;

impl RepairOperator for GreedyInsertion {
    fn name(&self) -> &str {
        "greedy_insertion"
    }

    fn repair<R: Rng>(
        &self,
        solution: &mut Solution,
        removed: Vec<Arc<Node>>,
        fleet: &FleetManager,
        rng: &mut R,
    ) {
        let mut nodes = removed;
        nodes.shuffle(rng);

        for node in nodes {
            match best_insertion(&node, solution, fleet) {
                Some(candidate) => apply(solution, candidate),
                None => log::warn!(
                    "no feasible insertion for platform '{}'; left unserved",
                    node.platform_code()
                ),
            }
        }
    }
}

/// Regret-2 insertion: repeatedly inserts the node whose best move is
/// most endangered.
///
/// For each remaining node the regret is `c2 - c1` over its sorted
/// feasible move costs (`+inf` when only one move exists, so nodes with
/// a single escape hatch go first). Ties keep first-seen order.
pub struct Regret2Insertion;

impl RepairOperator for Regret2Insertion {
    fn name(&self) -> &str {
        "regret_2_insertion"
    }

    fn repair<R: Rng>(
        &self,
        solution: &mut Solution,
        removed: Vec<Arc<Node>>,
        fleet: &FleetManager,
        _rng: &mut R,
    ) {
        let mut remaining = removed;

        while !remaining.is_empty() {
            let mut selected: Option<(usize, Candidate, f64)> = None;

            for (i, node) in remaining.iter().enumerate() {
                let mut moves = feasible_insertions(node, solution, fleet);
                if moves.is_empty() {
                    continue;
                }
                moves.sort_by(|a, b| a.delta.partial_cmp(&b.delta).unwrap_or(Ordering::Equal));

                let regret = if moves.len() > 1 {
                    moves[1].delta - moves[0].delta
                } else {
                    f64::INFINITY
                };

                let improves = match &selected {
                    None => true,
                    Some((_, _, best_regret)) => regret > *best_regret,
                };
                if improves {
                    selected = Some((i, moves.swap_remove(0), regret));
                }
            }

            match selected {
                Some((i, candidate, _)) => {
                    apply(solution, candidate);
                    remaining.remove(i);
                }
                None => {
                    for node in &remaining {
                        log::warn!(
                            "no feasible insertion for platform '{}'; left unserved",
                            node.platform_code()
                        );
                    }
                    break;
                }
            }
        }
    }
}

/// Enum dispatch over the repair operator family.
pub enum Repair {
    Greedy(GreedyInsertion),
    Regret(Regret2Insertion),
}

impl Repair {
    /// The standard operator set.
    pub fn standard() -> Vec<Repair> {
        vec![
            Repair::Greedy(GreedyInsertion),
            Repair::Regret(Regret2Insertion),
        ]
    }
}

impl RepairOperator for Repair {
    fn name(&self) -> &str {
        match self {
            Repair::Greedy(op) => op.name(),
            Repair::Regret(op) => op.name(),
        }
    }

    fn repair<R: Rng>(
        &self,
        solution: &mut Solution,
        removed: Vec<Arc<Node>>,
        fleet: &FleetManager,
        rng: &mut R,
    ) {
        match self {
            Repair::Greedy(op) => op.repair(solution, removed, fleet, rng),
            Repair::Regret(op) => op.repair(solution, removed, fleet, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::DistanceMatrix;
    use u_loading_core::{random::create_rng, Item, SolverConfig, VehicleType};

    fn setup(bonded_first: bool) -> (FleetManager, Arc<Node>, Arc<Node>, Vec<Arc<Node>>) {
        let mut m = DistanceMatrix::new(6);
        let coords: [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        for i in 0..6 {
            for j in 0..6 {
                if i != j {
                    m.set(i, j, (coords[i] - coords[j]).abs());
                }
            }
        }

        let catalog = vec![VehicleType::new("CT", 100.0, 100.0, 100.0, 1000.0)];
        let fleet = FleetManager::new(catalog, m, SolverConfig::default());

        let start = Arc::new(Node::depot(0, "start_point"));
        let end = Arc::new(Node::depot(5, "end_point"));
        let customers: Vec<Arc<Node>> = (1..=4)
            .map(|id| {
                Arc::new(Node::customer(
                    id,
                    format!("P{:02}", id),
                    bonded_first && id == 1,
                    vec![Arc::new(Item::new(
                        format!("I{}", id),
                        10.0,
                        10.0,
                        10.0,
                        1.0,
                    ))],
                ))
            })
            .collect();
        (fleet, start, end, customers)
    }

    #[test]
    fn test_greedy_inserts_all() {
        let (fleet, start, end, customers) = setup(false);
        let mut sol = Solution::new(start, end);

        let mut rng = create_rng(42);
        GreedyInsertion.repair(&mut sol, customers.clone(), &fleet, &mut rng);

        assert!(sol.covers(&customers));
        assert_eq!(sol.customer_count(), 4);
    }

    #[test]
    fn test_regret_inserts_all() {
        let (fleet, start, end, customers) = setup(false);
        let mut sol = Solution::new(start, end);

        let mut rng = create_rng(42);
        Regret2Insertion.repair(&mut sol, customers.clone(), &fleet, &mut rng);

        assert!(sol.covers(&customers));
        assert_eq!(sol.customer_count(), 4);
    }

    #[test]
    fn test_bonded_lands_first() {
        let (fleet, start, end, customers) = setup(true);
        let mut sol = Solution::new(start, end);

        let mut rng = create_rng(3);
        GreedyInsertion.repair(&mut sol, customers.clone(), &fleet, &mut rng);

        assert!(sol.covers(&customers));
        for route in sol.routes() {
            if route.serves(1) {
                assert!(route.sequence()[1].is_bonded());
            }
        }
    }

    #[test]
    fn test_admissible_positions_bonded_exclusive() {
        let (fleet, start, end, customers) = setup(true);
        let bonded = customers[0].clone();
        let route = fleet
            .find_best_vehicle(&[start.clone(), bonded.clone(), end.clone()])
            .expect("feasible");

        // Another bonded node cannot enter this route at all.
        let other_bonded = Arc::new(Node::customer(9, "P99", true, vec![]));
        assert!(admissible_positions(&route, &other_bonded).is_empty());

        // A plain node may only enter behind the bonded stop.
        let plain = customers[1].clone();
        let positions: Vec<usize> = admissible_positions(&route, &plain).collect();
        assert_eq!(positions, vec![2]);
    }

    #[test]
    fn test_admissible_positions_plain_route() {
        let (fleet, start, end, customers) = setup(false);
        let route = fleet
            .find_best_vehicle(&[
                start.clone(),
                customers[0].clone(),
                customers[1].clone(),
                end.clone(),
            ])
            .expect("feasible");

        let plain = customers[2].clone();
        let positions: Vec<usize> = admissible_positions(&route, &plain).collect();
        assert_eq!(positions, vec![1, 2, 3]);

        let bonded = Arc::new(Node::customer(9, "P99", true, vec![]));
        let positions: Vec<usize> = admissible_positions(&route, &bonded).collect();
        assert_eq!(positions, vec![1]);
    }

    #[test]
    fn test_oversized_node_left_unserved() {
        let (fleet, start, end, _) = setup(false);
        let giant = Arc::new(Node::customer(
            4,
            "P04",
            false,
            vec![Arc::new(Item::new("HUGE", 500.0, 500.0, 500.0, 1.0))],
        ));

        let mut sol = Solution::new(start, end);
        let mut rng = create_rng(1);
        GreedyInsertion.repair(&mut sol, vec![giant.clone()], &fleet, &mut rng);

        assert!(!sol.covers(&[giant]));
        assert!(sol.routes().is_empty());
    }

    #[test]
    fn test_insertion_prefers_cheapest_position() {
        let (fleet, start, end, customers) = setup(false);
        // Route serving 1 and 3; inserting 2 between them is free along
        // the line, anywhere else costs extra distance.
        let route = fleet
            .find_best_vehicle(&[
                start.clone(),
                customers[0].clone(),
                customers[2].clone(),
                end.clone(),
            ])
            .expect("feasible");
        let mut sol = Solution::new(start, end);
        sol.push_route(route);

        let candidate =
            best_insertion(&customers[1], &sol, &fleet).expect("feasible insertion");
        match candidate.mv {
            InsertionMove::Replace { route, .. } => {
                let ids: Vec<usize> = route.customers().map(|n| n.id()).collect();
                assert_eq!(ids, vec![1, 2, 3]);
            }
            InsertionMove::Open { .. } => panic!("expected in-route insertion"),
        }
    }
}
