//! Persistence Records for Site Calibration
//!
//! ## Overview
//!
//! The calibration engine in `sitecal-core` is pure: it takes points and
//! settings in and hands a result back. This crate shapes what the storage
//! layer keeps around that engine:
//!
//! - **`ProjectCoordinateSettings`**: the per-project record holding the
//!   reference system id, model units, calibration status, and the last
//!   fitted transform with its quality summary
//! - **`CalibrationSummary`**: the subset of `CalibrationQuality` worth storing
//! - **`PointErrorUpdate`**: the `calculated_error_m` write-back for each
//!   calibration point that took part in a fit
//!
//! No storage is owned here. Records are plain serde types with JSON helpers
//! so any backend can store them as documents or map them onto columns.
//!
//! ## Record Lifecycle
//!
//! ```text
//! not_calibrated ──calibrate(points) ok──→ calibrated ──calibrate(points) ok──→ calibrated
//!        ↑                                     │                    (replaced)
//!        └──────────────── reset() ────────────┘
//! ```
//!
//! A failed calibration returns an error and leaves the existing record as
//! it was, so a project never loses a working calibration to a bad retry.
//!
//! ## Usage Example
//!
//! ```rust
//! use sitecal_core::CalibrationPoint;
//! use sitecal_records::{CalibrationStatus, ProjectCoordinateSettings};
//!
//! let settings = ProjectCoordinateSettings::new("tower-b", "l-est97", "meters");
//! let points = [
//!     CalibrationPoint::new("p1".to_string(), 0.0, 0.0, 59.4370, 24.7536),
//!     CalibrationPoint::new("p2".to_string(), 100.0, 0.0, 59.4370, 24.7550),
//! ];
//!
//! let outcome = settings.calibrate(&points)?;
//! assert_eq!(outcome.settings.calibration_status, CalibrationStatus::Calibrated);
//! assert_eq!(outcome.point_updates.len(), 2);
//!
//! let json = outcome.settings.to_json()?;
//! let restored = ProjectCoordinateSettings::from_json(&json)?;
//! let (lat, lon) = {
//!     let geo = restored.mapper()?.model_to_geographic(100.0, 0.0)?;
//!     (geo.latitude, geo.longitude)
//! };
//! assert!((lat - 59.4370).abs() < 1e-9 && (lon - 24.7550).abs() < 1e-9);
//! # Ok::<(), sitecal_records::RecordError>(())
//! ```

use sitecal_core::CalibrationError;

pub mod settings;

pub use settings::{
    CalibrationOutcome, CalibrationStatus, CalibrationSummary, ProjectCoordinateSettings,
};
pub use sitecal_core::PointErrorUpdate;

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record-related errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum RecordError {
    #[error("Calibration failed: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Failed to encode record: {0}")]
    Encode(String),

    #[error("Failed to decode record: {0}")]
    Decode(String),

    #[error("Invalid calibration status: {0}")]
    InvalidStatus(String),
}

impl RecordError {
    /// The underlying calibration error, if that is what failed
    pub fn calibration(&self) -> Option<CalibrationError> {
        match self {
            Self::Calibration(e) => Some(*e),
            _ => None,
        }
    }
}
