//! # U-Loading Core
//!
//! Core data model and configuration for the U-Loading engine, a
//! heterogeneous-fleet capacitated vehicle routing solver with
//! three-dimensional loading constraints (3L-CVRP).
//!
//! This crate provides the types shared between the packing and routing
//! crates:
//!
//! - **Cargo model**: [`Item`], [`Node`], [`VehicleType`]
//! - **Plan model**: [`PackedItem`], [`PackedLoad`], [`Route`], [`Solution`]
//! - **Configuration**: [`SolverConfig`]
//! - **Errors**: [`Error`], [`Result`]
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod config;
pub mod error;
pub mod item;
pub mod node;
pub mod random;
pub mod route;
pub mod solution;
pub mod vehicle;

// Re-exports
pub use config::SolverConfig;
pub use error::{Error, Result};
pub use item::Item;
pub use node::Node;
pub use route::{route_signature, PackedItem, PackedLoad, Route};
pub use solution::Solution;
pub use vehicle::VehicleType;

/// Geometric tolerance used throughout the engine (millimeter scale).
pub const EPS: f64 = 1e-4;
