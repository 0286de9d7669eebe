//! Calibration Quality Assessment
//!
//! Re-applies a fitted transform to the points that produced it and scores
//! the residuals.
//!
//! ```text
//! residual_i = | T(model_i) − target_i |        (m)
//! rmse       = √( Σ residual_i² / n )
//! max_error  = max residual_i
//! ```
//!
//! | Class | RMSE (m) |
//! |---|---|
//! | excellent | ≤ 0.5 |
//! | good | ≤ 2.0 |
//! | fair | ≤ 5.0 |
//! | poor | > 5.0 |
//!
//! ## Two-Point Fits
//!
//! Two correspondences fix all four parameters, so their residuals are zero
//! by construction and the class reads `Excellent`. That says nothing about
//! GPS accuracy. `CalibrationQuality` therefore carries the point count, and
//! `is_underdetermined()` flags the case for the caller to surface.

use core::fmt;

use heapless::Vec;
use libm::sqrt;

use crate::{
    constants::quality::{RMSE_EXCELLENT_M, RMSE_FAIR_M, RMSE_GOOD_M},
    constants::solver::{MAX_CALIBRATION_POINTS, MIN_CALIBRATION_POINTS},
    errors::{CalibrationError, CalResult},
    geometry::PlanarPoint,
    helmert::HelmertTransformParams,
};

/// Per-point residuals, index-aligned with the points used for the fit
pub type Residuals = Vec<f64, MAX_CALIBRATION_POINTS>;

/// Ordinal fit class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FitQuality {
    /// RMSE up to 0.5 m
    Excellent,
    /// RMSE up to 2 m
    Good,
    /// RMSE up to 5 m
    Fair,
    /// RMSE above 5 m, or not a number
    Poor,
}

impl FitQuality {
    /// Classify an RMSE in meters
    pub fn from_rmse(rmse: f64) -> Self {
        if rmse <= RMSE_EXCELLENT_M {
            Self::Excellent
        } else if rmse <= RMSE_GOOD_M {
            Self::Good
        } else if rmse <= RMSE_FAIR_M {
            Self::Fair
        } else {
            // NaN lands here too
            Self::Poor
        }
    }

    /// Lowercase name as stored
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for FitQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Residual summary of a fit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationQuality {
    /// Root-mean-square residual (m)
    pub rmse: f64,
    /// Largest residual (m)
    pub max_error: f64,
    /// Class derived from `rmse`
    pub quality: FitQuality,
    /// Residual per point (m), in fit order
    pub errors: Residuals,
}

impl CalibrationQuality {
    /// Number of points the fit used
    pub fn point_count(&self) -> usize {
        self.errors.len()
    }

    /// Observations beyond the four the parameters consume (2n − 4)
    pub fn redundancy(&self) -> usize {
        (2 * self.point_count()).saturating_sub(4)
    }

    /// Exact fit with no redundancy: the class is not independently verified
    pub fn is_underdetermined(&self) -> bool {
        self.point_count() <= MIN_CALIBRATION_POINTS
    }

    /// Index of the point with the largest residual
    pub fn worst_point(&self) -> Option<usize> {
        self.errors
            .iter()
            .enumerate()
            .fold(None, |worst: Option<(usize, f64)>, (i, &e)| match worst {
                Some((_, best)) if best >= e => worst,
                _ => Some((i, e)),
            })
            .map(|(i, _)| i)
    }
}

/// Score `transform` against the point pairs it was fitted from
pub fn assess_quality(
    transform: &HelmertTransformParams,
    model: &[PlanarPoint],
    target: &[PlanarPoint],
) -> CalResult<CalibrationQuality> {
    if model.len() != target.len() {
        return Err(CalibrationError::InvalidCoordinate {
            reason: "model and target point counts differ",
        });
    }
    if model.is_empty() {
        return Err(CalibrationError::InsufficientPoints {
            required: MIN_CALIBRATION_POINTS,
            available: 0,
        });
    }

    let mut errors = Residuals::new();
    let mut sum_sq = 0.0;
    let mut max_error: f64 = 0.0;
    for (m, t) in model.iter().zip(target.iter()) {
        let residual = transform.apply(*m).distance(t);
        errors
            .push(residual)
            .map_err(|_| CalibrationError::TooManyPoints {
                capacity: MAX_CALIBRATION_POINTS,
                available: model.len(),
            })?;
        sum_sq += residual * residual;
        max_error = max_error.max(residual);
    }

    let rmse = sqrt(sum_sq / model.len() as f64);
    let quality = FitQuality::from_rmse(rmse);

    log_debug!(
        "Calibration quality: rmse={}m max={}m class={} points={}",
        rmse, max_error, quality, errors.len()
    );

    Ok(CalibrationQuality { rmse, max_error, quality, errors })
}
