//! Error types for U-Loading.

use thiserror::Error;

/// Result type alias for U-Loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or solving an instance.
///
/// Infeasible packing or routing candidates are *not* errors; they are
/// ordinary `Option`/`bool` outcomes handled locally by the search
/// operators. Only fatal input and configuration problems surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed problem instance.
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// Invalid item or vehicle geometry.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A distance-map entry references a platform code that does not exist.
    #[error("Unknown platform code in distance map: {0}")]
    UnknownPlatform(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
