//! Solver configuration.

use crate::{Error, Result};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the U-Loading solver.
///
/// Covers the physical packing constraints, the two-term objective
/// `alpha * (1 - mean load rate) + beta * total distance`, and the
/// ALNS / simulated-annealing search parameters.
///
/// # Examples
///
/// ```
/// use u_loading_core::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_max_iterations(2000)
///     .with_temperature(100.0, 0.9995)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Required supported fraction of an item's footprint, in (0, 1].
    /// 1.0 demands full-footprint support (no overhang at all).
    pub support_ratio: f64,

    /// Height-map grid precision in millimeters per cell.
    pub grid_precision: f64,

    /// Objective weight on `(1 - mean load rate)`.
    pub alpha: f64,

    /// Objective weight on total route distance.
    pub beta: f64,

    /// Maximum number of ALNS iterations.
    pub max_iterations: usize,

    /// Wall-clock budget for a search run.
    pub max_runtime: Duration,

    /// Iteration interval for cost-history sampling.
    pub segment_size: usize,

    /// Initial simulated-annealing temperature.
    pub start_temp: f64,

    /// Geometric cooling rate, in (0, 1).
    pub cooling_rate: f64,

    /// Enables the signature-keyed packing memo cache.
    pub enable_cache: bool,

    /// Random seed for reproducibility (`None` = draw one at run start).
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            support_ratio: 1.0,
            grid_precision: 1.0,
            alpha: 100_000.0,
            beta: 1.0,
            max_iterations: 5000,
            max_runtime: Duration::from_secs(3600),
            segment_size: 100,
            start_temp: 100.0,
            cooling_rate: 0.9995,
            enable_cache: true,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the required support ratio.
    pub fn with_support_ratio(mut self, ratio: f64) -> Self {
        self.support_ratio = ratio;
        self
    }

    /// Sets the height-map grid precision (mm per cell).
    pub fn with_grid_precision(mut self, precision: f64) -> Self {
        self.grid_precision = precision;
        self
    }

    /// Sets the objective weights.
    pub fn with_objective_weights(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Sets the maximum iteration count.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_max_runtime(mut self, budget: Duration) -> Self {
        self.max_runtime = budget;
        self
    }

    /// Sets the cost-history segment size.
    pub fn with_segment_size(mut self, n: usize) -> Self {
        self.segment_size = n.max(1);
        self
    }

    /// Sets the annealing schedule.
    pub fn with_temperature(mut self, start: f64, cooling_rate: f64) -> Self {
        self.start_temp = start;
        self.cooling_rate = cooling_rate;
        self
    }

    /// Enables or disables the packing cache.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.enable_cache = enabled;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.support_ratio <= 0.0 || self.support_ratio > 1.0 {
            return Err(Error::ConfigError(format!(
                "support_ratio must be in (0, 1], got {}",
                self.support_ratio
            )));
        }
        if self.grid_precision <= 0.0 {
            return Err(Error::ConfigError(format!(
                "grid_precision must be positive, got {}",
                self.grid_precision
            )));
        }
        if self.alpha < 0.0 || self.beta < 0.0 {
            return Err(Error::ConfigError(
                "objective weights must be non-negative".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(Error::ConfigError("max_iterations must be positive".into()));
        }
        if self.start_temp <= 0.0 {
            return Err(Error::ConfigError("start_temp must be positive".into()));
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(Error::ConfigError(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_iterations, 5000);
        assert!(config.enable_cache);
    }

    #[test]
    fn test_builder_chain() {
        let config = SolverConfig::default()
            .with_support_ratio(0.8)
            .with_grid_precision(50.0)
            .with_objective_weights(1000.0, 2.0)
            .with_max_iterations(100)
            .with_segment_size(10)
            .with_temperature(50.0, 0.99)
            .with_cache(false)
            .with_seed(7);

        assert!((config.support_ratio - 0.8).abs() < 1e-12);
        assert!((config.grid_precision - 50.0).abs() < 1e-12);
        assert_eq!(config.max_iterations, 100);
        assert!(!config.enable_cache);
        assert_eq!(config.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_support_ratio() {
        assert!(SolverConfig::default()
            .with_support_ratio(0.0)
            .validate()
            .is_err());
        assert!(SolverConfig::default()
            .with_support_ratio(1.5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_bad_cooling() {
        assert!(SolverConfig::default()
            .with_temperature(100.0, 1.0)
            .validate()
            .is_err());
        assert!(SolverConfig::default()
            .with_temperature(100.0, 0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        assert!(SolverConfig::default()
            .with_max_iterations(0)
            .validate()
            .is_err());
    }
}
