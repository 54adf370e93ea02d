//! # U-Loading
//!
//! Heterogeneous-fleet capacitated vehicle routing with three-dimensional
//! loading constraints (3L-CVRP).
//!
//! Customer platforms, each with a list of rigid boxes, are partitioned
//! into open-loop routes. Every route is bound to the smallest vehicle
//! from a heterogeneous catalog whose cargo bay accepts a
//! sequence-dependent 3D packing of all its stops. An adaptive large
//! neighborhood search minimizes
//! `alpha * (1 - mean load rate) + beta * total distance`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use u_loading::core::SolverConfig;
//! use u_loading::routing::{AlnsRunner, FleetManager};
//!
//! let config = SolverConfig::default().with_seed(42);
//! let fleet = FleetManager::new(vehicle_types, distances, config.clone());
//! let result = AlnsRunner::new(config).run(&fleet, &start, &end, &customers);
//! println!("best cost: {:.2}", result.best_cost);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support for the core model types

/// Core data model and configuration.
pub use u_loading_core as core;

/// Geometry kernel and sequence-dependent packer.
pub use u_loading_packing as packing;

/// Fleet manager, operators, and the ALNS driver.
pub use u_loading_routing as routing;

// Re-export commonly used types at root level
pub use u_loading_core::{Item, Node, Route, Solution, SolverConfig, VehicleType};
pub use u_loading_routing::{AlnsResult, AlnsRunner, DistanceMatrix, FleetManager};
