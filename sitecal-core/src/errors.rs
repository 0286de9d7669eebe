//! Error Types for Calibration Failures
//!
//! ## Design Philosophy
//!
//! Every failure the calibration engine can report is an expected input
//! problem, not a systemic fault. The error type follows from that:
//!
//! 1. **Copy Semantics**: Errors carry only numbers and `&'static str`, so they
//!    can be returned, stored and compared without allocation.
//!
//! 2. **Distinct Causes**: "too few points" and "points badly distributed" are
//!    separate variants so a capture UI can tell the user which one to fix.
//!
//! 3. **No Retries**: Nothing here is transient. A failed calibration yields no
//!    result and leaves previously persisted state alone.
//!
//! ## Error Categories
//!
//! ### Point Set Problems
//! - `InsufficientPoints`: fewer than two active points
//! - `DegeneratePoints`: active points have (numerically) zero spread
//! - `TooManyPoints`: more points than the fixed-capacity buffers hold
//! - `InvalidCoordinate`: NaN, infinity, or latitude/longitude out of range
//! - `PointSetMismatch`: residual write-back against a different active set
//!
//! ### Configuration Problems
//! - `UnsupportedUnit`: model unit string not in the unit table
//! - `UnknownReferenceSystem`: coordinate system id not in the registry
//!
//! ### Mapping Problems
//! - `NotCalibrated`: coordinate conversion requested without a transform
//! - `ProjectionDiverged`: an inverse projection failed to converge
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use sitecal_core::{calibrate, CalibrationError, CalibrationPoint, ModelUnits};
//!
//! fn recalibrate(points: &[CalibrationPoint<u32>]) {
//!     match calibrate(points, "l-est97", ModelUnits::Millimeters) {
//!         Ok(result) => {
//!             // persist result.transform and result.quality
//!         }
//!         Err(CalibrationError::InsufficientPoints { .. }) => {
//!             // ask the inspector to capture another point
//!         }
//!         Err(CalibrationError::DegeneratePoints { .. }) => {
//!             // points are on top of each other; spread them out
//!         }
//!         Err(_) => {
//!             // configuration or input problem
//!         }
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for calibration operations
pub type CalResult<T> = Result<T, CalibrationError>;

/// Calibration errors - all recoverable input-validation outcomes
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    /// Fewer active points than a similarity fit needs
    #[error("Insufficient points: need {required}, have {available}")]
    InsufficientPoints {
        /// Minimum number of active points for a fit
        required: usize,
        /// Number of active points supplied
        available: usize,
    },

    /// Model points are coincident, so scale and rotation are undefined
    #[error("Degenerate points: model spread {spread} m^2 is too small")]
    DegeneratePoints {
        /// Sum of squared centred model distances (m^2)
        spread: f64,
    },

    /// More points than the fixed-capacity buffers can hold
    #[error("Too many points: capacity {capacity}, have {available}")]
    TooManyPoints {
        /// Compile-time point capacity
        capacity: usize,
        /// Number of points supplied
        available: usize,
    },

    /// A coordinate is non-finite or outside its valid range
    #[error("Invalid coordinate: {reason}")]
    InvalidCoordinate {
        /// Which check failed
        reason: &'static str,
    },

    /// Residuals were requested for a point set that was not the one fitted
    #[error("Point set changed since calibration: fitted {fitted}, now active {active}")]
    PointSetMismatch {
        /// Points the calibration used
        fitted: usize,
        /// Active points in the slice supplied now
        active: usize,
    },

    /// Model unit is not one of millimeters, centimeters, meters
    #[error("Unsupported model unit")]
    UnsupportedUnit,

    /// Coordinate system id is not in the registry
    #[error("Unknown reference system")]
    UnknownReferenceSystem,

    /// No fitted transform is available for coordinate mapping
    #[error("Project is not calibrated")]
    NotCalibrated,

    /// Iterative inverse projection did not converge
    #[error("Inverse projection did not converge")]
    ProjectionDiverged,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalibrationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InsufficientPoints { required, available } =>
                defmt::write!(fmt, "Need {} points, have {}", required, available),
            Self::DegeneratePoints { spread } =>
                defmt::write!(fmt, "Degenerate points, spread {}", spread),
            Self::TooManyPoints { capacity, available } =>
                defmt::write!(fmt, "Capacity {}, have {} points", capacity, available),
            Self::InvalidCoordinate { reason } =>
                defmt::write!(fmt, "Invalid coordinate: {}", reason),
            Self::PointSetMismatch { fitted, active } =>
                defmt::write!(fmt, "Fitted {} points, now {} active", fitted, active),
            Self::UnsupportedUnit =>
                defmt::write!(fmt, "Unsupported unit"),
            Self::UnknownReferenceSystem =>
                defmt::write!(fmt, "Unknown reference system"),
            Self::NotCalibrated =>
                defmt::write!(fmt, "Not calibrated"),
            Self::ProjectionDiverged =>
                defmt::write!(fmt, "Projection diverged"),
        }
    }
}
