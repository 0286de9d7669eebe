//! Model unit conversion
//!
//! BIM models are authored in millimeters, centimeters or meters. The solver
//! works in meters, so model coordinates are multiplied by the unit's factor
//! on the way in and divided by it on the way out.

use core::fmt;
use core::str::FromStr;

use crate::errors::{CalibrationError, CalResult};

/// Linear unit of a model's local coordinate frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ModelUnits {
    /// 0.001 m
    Millimeters,
    /// 0.01 m
    Centimeters,
    /// 1 m
    Meters,
}

impl ModelUnits {
    /// Meters per model unit
    pub const fn to_meters_factor(self) -> f64 {
        match self {
            Self::Millimeters => 0.001,
            Self::Centimeters => 0.01,
            Self::Meters => 1.0,
        }
    }

    /// Model units to meters
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.to_meters_factor()
    }

    /// Meters to model units
    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.to_meters_factor()
    }

    /// Name as stored in project settings
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Millimeters => "millimeters",
            Self::Centimeters => "centimeters",
            Self::Meters => "meters",
        }
    }
}

impl FromStr for ModelUnits {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "millimeters" => Ok(Self::Millimeters),
            "centimeters" => Ok(Self::Centimeters),
            "meters" => Ok(Self::Meters),
            _ => Err(CalibrationError::UnsupportedUnit),
        }
    }
}

impl fmt::Display for ModelUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meters per unit for a unit name from project settings
pub fn units_to_meters(unit: &str) -> CalResult<f64> {
    unit.parse::<ModelUnits>().map(ModelUnits::to_meters_factor)
}
