//! Two-Dimensional Helmert (Similarity) Transform
//!
//! ## Model
//!
//! A similarity transform maps model meters onto grid meters with one
//! uniform scale, one rotation and a translation:
//!
//! ```text
//! X = s·(cos θ·x − sin θ·y) + tx
//! Y = s·(sin θ·x + cos θ·y) + ty
//! ```
//!
//! ## Closed-Form Least Squares
//!
//! With both point sets reduced to their centroids (lower-case = centred),
//! the least-squares solution needs three sums:
//!
//! ```text
//! Sxx  = Σ (mx² + my²)
//! Sxy  = Σ (mx·ty − my·tx)
//! Sxx2 = Σ (mx·tx + my·ty)
//!
//! s = √(Sxx2² + Sxy²) / Sxx
//! θ = atan2(Sxy, Sxx2)
//! t = target_centroid − s·R(θ)·model_centroid
//! ```
//!
//! Two points determine the four parameters exactly; three or more give the
//! least-squares optimum. No iteration is involved.
//!
//! ## Failure Modes
//!
//! - fewer than two points: `InsufficientPoints`, checked before any math
//! - `Sxx` below `DEGENERATE_SPREAD_EPSILON_M2`: `DegeneratePoints`
//! - coincident targets (zero scale): `DegeneratePoints`, since the inverse
//!   would divide by zero

use libm::{atan2, hypot};

use crate::{
    constants::solver::{DEGENERATE_SPREAD_EPSILON_M2, MAX_CALIBRATION_POINTS, MIN_CALIBRATION_POINTS},
    errors::{CalibrationError, CalResult},
    geometry::{centroid, PlanarPoint},
};

/// Fitted similarity transform from model meters to grid meters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HelmertTransformParams {
    /// Grid meters per model meter
    pub scale: f64,
    /// Rotation from model axes to grid axes (radians, counter-clockwise)
    pub rotation: f64,
    /// Grid easting of the model origin (m)
    pub translation_x: f64,
    /// Grid northing of the model origin (m)
    pub translation_y: f64,
}

impl HelmertTransformParams {
    /// Transform that maps every point to itself
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        rotation: 0.0,
        translation_x: 0.0,
        translation_y: 0.0,
    };

    /// Model meters to grid meters
    pub fn apply(&self, model: PlanarPoint) -> PlanarPoint {
        model
            .rotated(self.rotation)
            .scaled(self.scale)
            .offset(self.translation_x, self.translation_y)
    }

    /// Grid meters to model meters
    pub fn apply_inverse(&self, grid: PlanarPoint) -> PlanarPoint {
        grid.offset(-self.translation_x, -self.translation_y)
            .rotated(-self.rotation)
            .scaled(1.0 / self.scale)
    }

    /// The inverse similarity as its own parameter set
    pub fn inverse(&self) -> HelmertTransformParams {
        let inv_scale = 1.0 / self.scale;
        let t = PlanarPoint::new(self.translation_x, self.translation_y)
            .rotated(-self.rotation)
            .scaled(-inv_scale);
        HelmertTransformParams {
            scale: inv_scale,
            rotation: -self.rotation,
            translation_x: t.x,
            translation_y: t.y,
        }
    }

    /// Finite parameters with a positive scale
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite()
            && self.scale > 0.0
            && self.rotation.is_finite()
            && self.translation_x.is_finite()
            && self.translation_y.is_finite()
    }

    /// Rotation in degrees, for display
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }
}

/// Fit a similarity transform mapping `model` onto `target`
///
/// Both slices are in meters and matched index for index.
pub fn solve_helmert(model: &[PlanarPoint], target: &[PlanarPoint]) -> CalResult<HelmertTransformParams> {
    if model.len() != target.len() {
        return Err(CalibrationError::InvalidCoordinate {
            reason: "model and target point counts differ",
        });
    }
    let n = model.len();
    if n < MIN_CALIBRATION_POINTS {
        return Err(CalibrationError::InsufficientPoints {
            required: MIN_CALIBRATION_POINTS,
            available: n,
        });
    }
    if n > MAX_CALIBRATION_POINTS {
        return Err(CalibrationError::TooManyPoints {
            capacity: MAX_CALIBRATION_POINTS,
            available: n,
        });
    }
    for p in model.iter().chain(target.iter()) {
        p.check()?;
    }

    let (model_c, target_c) = match (centroid(model), centroid(target)) {
        (Some(m), Some(t)) => (m, t),
        _ => {
            return Err(CalibrationError::InsufficientPoints {
                required: MIN_CALIBRATION_POINTS,
                available: 0,
            })
        }
    };

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut sxx2 = 0.0;
    for (m, t) in model.iter().zip(target.iter()) {
        let mx = m.x - model_c.x;
        let my = m.y - model_c.y;
        let tx = t.x - target_c.x;
        let ty = t.y - target_c.y;
        sxx += mx * mx + my * my;
        sxy += mx * ty - my * tx;
        sxx2 += mx * tx + my * ty;
    }

    if !(sxx >= DEGENERATE_SPREAD_EPSILON_M2) {
        return Err(CalibrationError::DegeneratePoints { spread: sxx });
    }

    let scale = hypot(sxx2, sxy) / sxx;
    if !(scale > 0.0) {
        // Targets coincide: every model point would collapse onto one spot
        return Err(CalibrationError::DegeneratePoints { spread: 0.0 });
    }
    let rotation = atan2(sxy, sxx2);

    let placed = model_c.rotated(rotation).scaled(scale);
    let params = HelmertTransformParams {
        scale,
        rotation,
        translation_x: target_c.x - placed.x,
        translation_y: target_c.y - placed.y,
    };

    log_debug!(
        "Helmert fit over {} points: scale={} rotation={}rad t=({}, {})",
        n, params.scale, params.rotation, params.translation_x, params.translation_y
    );

    Ok(params)
}
