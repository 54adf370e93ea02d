//! Vehicle types.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vehicle type from the heterogeneous fleet catalog.
///
/// Interior dimensions are millimeters, payload is kilograms. The fleet
/// manager keeps its catalog sorted by ascending interior volume so the
/// smallest feasible vehicle is found first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleType {
    code: String,
    length: f64,
    width: f64,
    height: f64,
    max_weight: f64,
}

impl VehicleType {
    /// Creates a new vehicle type.
    pub fn new(
        code: impl Into<String>,
        length: f64,
        width: f64,
        height: f64,
        max_weight: f64,
    ) -> Self {
        Self {
            code: code.into(),
            length,
            width,
            height,
            max_weight,
        }
    }

    /// Returns the type code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the interior length (x axis, the loading direction).
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the interior width (y axis).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the interior height (z axis).
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the maximum payload mass.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Returns the interior volume.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Validates the vehicle geometry.
    pub fn validate(&self) -> Result<()> {
        if self.length <= 0.0 || self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "vehicle '{}' must have positive interior dimensions",
                self.code
            )));
        }
        if self.max_weight <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "vehicle '{}' must have positive payload",
                self.code
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_volume() {
        let v = VehicleType::new("CT5", 4000.0, 2000.0, 2000.0, 5000.0);
        assert_relative_eq!(v.volume(), 1.6e10, epsilon = 1.0);
    }

    #[test]
    fn test_validate() {
        assert!(VehicleType::new("OK", 1.0, 1.0, 1.0, 1.0).validate().is_ok());
        assert!(VehicleType::new("BAD", -1.0, 1.0, 1.0, 1.0)
            .validate()
            .is_err());
        assert!(VehicleType::new("BAD", 1.0, 1.0, 1.0, 0.0)
            .validate()
            .is_err());
    }
}
