//! # U-Loading CLI
//!
//! Instance loading and result serialization around the U-Loading
//! solver, plus the batch driver binary.
//!
//! The file formats follow the logistics-platform schema: an instance
//! JSON with `algorithmBaseParamDto` (truck catalog, platform list,
//! distance map) and a `boxes` array; a result JSON with
//! `solutionArray` per-vehicle stop orders and placements.

pub mod instance;
pub mod output;

pub use instance::{load_instance, parse_instance, Instance, ParseError};
pub use output::{build_result, write_report, write_result, SolutionFile};
