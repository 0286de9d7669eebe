//! Constants for SiteCal Core
//!
//! Centralised numeric values used by the calibration engine. Every value
//! carries its unit in the name or the doc comment.
//!
//! ## Organization
//!
//! - **Geodesy**: Ellipsoid parameters and coordinate limits
//! - **Quality**: RMSE thresholds for fit classification
//! - **Solver**: Point-count limits, degeneracy threshold, iteration limits

/// Ellipsoid parameters and geographic coordinate limits.
pub mod geodesy;

/// RMSE thresholds for calibration quality classes.
pub mod quality;

/// Solver limits and numerical tolerances.
pub mod solver;

pub use geodesy::{GRS80_SEMI_MAJOR_M, GRS80_FLATTENING, WGS84_SEMI_MAJOR_M, WGS84_FLATTENING};

pub use quality::{RMSE_EXCELLENT_M, RMSE_GOOD_M, RMSE_FAIR_M};

pub use solver::{MAX_CALIBRATION_POINTS, MIN_CALIBRATION_POINTS, DEGENERATE_SPREAD_EPSILON_M2};
