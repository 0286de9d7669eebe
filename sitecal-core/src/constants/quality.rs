//! Calibration Quality Thresholds
//!
//! RMSE limits for the ordinal fit classes. The scale is set against
//! handheld GPS: consumer receivers are typically good to 3-10 m, survey
//! receivers with corrections to a few centimetres.

/// Upper RMSE bound for an excellent fit (m).
///
/// Achievable with RTK or carefully averaged readings.
pub const RMSE_EXCELLENT_M: f64 = 0.5;

/// Upper RMSE bound for a good fit (m).
///
/// A good phone fix in open sky.
pub const RMSE_GOOD_M: f64 = 2.0;

/// Upper RMSE bound for a fair fit (m).
///
/// Consumer GPS near buildings. Anything above is poor.
pub const RMSE_FAIR_M: f64 = 5.0;
