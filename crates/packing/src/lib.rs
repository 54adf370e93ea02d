//! # U-Loading Packing
//!
//! Sequence-dependent 3D bin packing for the U-Loading engine.
//!
//! A route's cargo is packed strictly in visit order: each stop's items
//! are placed before the next stop's, preferring low-`x` corners, so
//! earlier stops' cargo ends up on the inside of the bay and unload
//! order is respected. Placement candidates come from an extreme-point
//! set and are screened against three constraint families:
//!
//! - **Boundary**: the oriented box fits inside the cargo bay
//! - **Collision**: no strict overlap with already-placed boxes
//! - **Support**: the footprint rests on the floor or on a level surface
//!   ([`HeightMap`])
//!
//! Packing a fixed `(vehicle, sequence)` pair is deterministic, so
//! results are memoized by route signature in [`SequencePacker`].

pub mod collision;
pub mod extreme_point;
pub mod height_map;
pub mod packer;

// Re-exports
pub use collision::{Aabb, PlacedBoxes};
pub use extreme_point::ExtremePointSet;
pub use height_map::HeightMap;
pub use packer::SequencePacker;
