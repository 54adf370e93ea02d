//! # U-Loading Routing
//!
//! Fleet management and ALNS search for the U-Loading engine.
//!
//! - [`fleet`] — [`DistanceMatrix`] lookup and the smallest-feasible-vehicle
//!   search ([`FleetManager::find_best_vehicle`])
//! - [`destroy`] — Destroy operators (random, worst-cost, Shaw relatedness)
//! - [`repair`] — Repair operators (greedy insertion, regret-2 insertion)
//! - [`alns`] — The adaptive large neighborhood search driver with
//!   simulated-annealing acceptance
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

pub mod alns;
pub mod destroy;
pub mod fleet;
pub mod repair;

pub use alns::{AlnsResult, AlnsRunner};
pub use destroy::{Destroy, DestroyOperator, RandomRemoval, ShawRemoval, WorstRemoval};
pub use fleet::{DistanceMatrix, FleetManager};
pub use repair::{GreedyInsertion, Regret2Insertion, Repair, RepairOperator};
