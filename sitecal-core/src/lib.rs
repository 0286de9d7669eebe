//! Site calibration engine for SiteCal
//!
//! Aligns a BIM model's local Cartesian frame with real-world GPS positions
//! using a handful of captured correspondence points. A 2D Helmert
//! (similarity) transform is fitted by closed-form least squares between
//! model meters and a projected national grid, scored by its residuals, and
//! then used to map coordinates in both directions.
//!
//! Key constraints:
//! - Pure functions of explicit inputs: no I/O, no global state, no caches
//! - No heap allocation; point buffers have a fixed capacity
//! - Every failure is a typed, recoverable `CalibrationError`
//!
//! ```no_run
//! use sitecal_core::{calibrate, CalibrationPoint, ModelUnits};
//!
//! let points = [
//!     CalibrationPoint::new("p1", 0.0, 0.0, 59.4370, 24.7536),
//!     CalibrationPoint::new("p2", 100_000.0, 0.0, 59.4370, 24.7550),
//!     CalibrationPoint::new("p3", 0.0, 100_000.0, 59.4379, 24.7536),
//! ];
//!
//! match calibrate(&points, "l-est97", ModelUnits::Millimeters) {
//!     Ok(result) => {}, // persist result.transform and result.quality
//!     Err(e) => {},     // report why the calibration was rejected
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod calibration;
pub mod constants;
pub mod errors;
pub mod geometry;
pub mod helmert;
pub mod mapper;
pub mod projection;
pub mod quality;
pub mod reference;
pub mod traits;
pub mod units;

// Public API
pub use errors::{CalibrationError, CalResult};
pub use calibration::{
    calibrate, CalibrationPoint, CalibrationResult, Calibrator, FittedIndices, PointErrorUpdate,
    PointErrorUpdates,
};
pub use geometry::{GeoPoint, PlanarPoint};
pub use helmert::{solve_helmert, HelmertTransformParams};
pub use mapper::{geographic_to_model, model_to_geographic, CoordinateMapper};
pub use quality::{assess_quality, CalibrationQuality, FitQuality};
pub use reference::{lookup_reference_system, reference_systems, ReferenceSystem};
pub use traits::Projection;
pub use units::{units_to_meters, ModelUnits};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
