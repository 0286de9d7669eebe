//! Calibration Orchestrator
//!
//! ## Flow
//!
//! ```text
//! CalibrationPoint[] ──filter active──→ ≥ 2? ──no──→ InsufficientPoints
//!                                        │
//!                   model xy × unit factor     gps lat/lon → grid projection
//!                                        │
//!                               solve_helmert(model m, grid m)
//!                                        │
//!                               assess_quality(same order)
//!                                        │
//!                               CalibrationResult { transform, quality, fitted }
//! ```
//!
//! Nothing is persisted here. The caller stores the result and writes each
//! point's `calculated_error_m` back through `error_updates()`. The result
//! records the input positions of the points it fitted, so the write-back is
//! refused if the point slice no longer has the same active set.
//!
//! ## Usage Example
//!
//! ```rust
//! use sitecal_core::{calibrate, CalibrationPoint, FitQuality, ModelUnits};
//!
//! let points = [
//!     CalibrationPoint::new(1u32, 0.0, 0.0, 59.4370, 24.7536),
//!     CalibrationPoint::new(2u32, 100.0, 0.0, 59.4370, 24.7550),
//! ];
//! let result = calibrate(&points, "l-est97", ModelUnits::Meters)?;
//! assert_eq!(result.quality.quality, FitQuality::Excellent);
//! assert!(result.quality.is_underdetermined());
//! # Ok::<(), sitecal_core::CalibrationError>(())
//! ```

use heapless::Vec;

use crate::{
    constants::solver::{MAX_CALIBRATION_POINTS, MIN_CALIBRATION_POINTS},
    errors::{CalibrationError, CalResult},
    geometry::{GeoPoint, PlanarPoint},
    helmert::{solve_helmert, HelmertTransformParams},
    mapper::CoordinateMapper,
    quality::{assess_quality, CalibrationQuality},
    reference::{lookup_reference_system, ReferenceSystem},
    traits::Projection,
    units::ModelUnits,
};

/// One captured model ↔ GPS correspondence
///
/// `Id` is whatever the storage layer uses to identify the point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationPoint<Id> {
    /// Identifier owned by the point-capture store
    pub id: Id,
    /// Model-frame position in model units
    pub model_x: f64,
    /// Model-frame y in model units
    pub model_y: f64,
    /// Informational; the fit is planar
    pub model_z: Option<f64>,
    /// WGS84 degrees
    pub gps_latitude: f64,
    /// WGS84 longitude (degrees)
    pub gps_longitude: f64,
    /// Ellipsoidal height (m); informational
    pub gps_altitude: Option<f64>,
    /// Device-reported accuracy (m); all points are weighted equally
    pub gps_accuracy_m: Option<f64>,
    /// Inactive points are kept for audit but left out of the fit
    pub is_active: bool,
    /// Residual from the most recent fit (m)
    pub calculated_error_m: Option<f64>,
}

impl<Id> CalibrationPoint<Id> {
    /// Active point with only the fields the fit needs
    pub fn new(id: Id, model_x: f64, model_y: f64, gps_latitude: f64, gps_longitude: f64) -> Self {
        Self {
            id,
            model_x,
            model_y,
            model_z: None,
            gps_latitude,
            gps_longitude,
            gps_altitude: None,
            gps_accuracy_m: None,
            is_active: true,
            calculated_error_m: None,
        }
    }

    /// Set whether the point takes part in the fit
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Record the device-reported accuracy (m)
    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.gps_accuracy_m = Some(accuracy_m);
        self
    }

    /// GPS position as a `GeoPoint`
    pub fn gps(&self) -> GeoPoint {
        GeoPoint::new(self.gps_latitude, self.gps_longitude)
    }
}

/// Fitted transform plus its residual report
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationResult {
    /// Model meters to grid meters
    pub transform: HelmertTransformParams,
    /// Residual report, in fit order
    pub quality: CalibrationQuality,
    /// Input-slice positions of the points used, aligned with `quality.errors`
    pub fitted: FittedIndices,
}

/// New `calculated_error_m` for one stored point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointErrorUpdate<Id> {
    /// Storage id of the point
    pub id: Id,
    /// Residual of the point in the new fit (m)
    pub calculated_error_m: f64,
}

/// Per-point update payload, one entry per active point
pub type PointErrorUpdates<Id> = Vec<PointErrorUpdate<Id>, MAX_CALIBRATION_POINTS>;

/// Positions of fitted points within the calibrated slice
pub type FittedIndices = Vec<usize, MAX_CALIBRATION_POINTS>;

type PointBuffer = Vec<PlanarPoint, MAX_CALIBRATION_POINTS>;

/// Calibration against one reference system in one model unit
#[derive(Debug, Clone, Copy)]
pub struct Calibrator {
    reference: &'static ReferenceSystem,
    units: ModelUnits,
}

impl Calibrator {
    /// Calibrator for an already resolved reference system
    pub fn new(reference: &'static ReferenceSystem, units: ModelUnits) -> Self {
        Self { reference, units }
    }

    /// Build from the raw ids stored in project settings
    pub fn from_settings(coordinate_system_id: &str, model_units: &str) -> CalResult<Self> {
        Ok(Self {
            reference: lookup_reference_system(coordinate_system_id)?,
            units: model_units.parse()?,
        })
    }

    /// Target reference system
    pub fn reference(&self) -> &'static ReferenceSystem {
        self.reference
    }

    /// Model unit
    pub fn units(&self) -> ModelUnits {
        self.units
    }

    /// Fit a transform from the active points
    pub fn calibrate<Id>(&self, points: &[CalibrationPoint<Id>]) -> CalResult<CalibrationResult> {
        let active = points.iter().filter(|p| p.is_active).count();
        if active < MIN_CALIBRATION_POINTS {
            return Err(CalibrationError::InsufficientPoints {
                required: MIN_CALIBRATION_POINTS,
                available: active,
            });
        }
        if active > MAX_CALIBRATION_POINTS {
            return Err(CalibrationError::TooManyPoints {
                capacity: MAX_CALIBRATION_POINTS,
                available: active,
            });
        }

        let overflow = || CalibrationError::TooManyPoints {
            capacity: MAX_CALIBRATION_POINTS,
            available: active,
        };
        let mut model = PointBuffer::new();
        let mut grid = PointBuffer::new();
        let mut fitted = FittedIndices::new();
        for (index, point) in points.iter().enumerate().filter(|(_, p)| p.is_active) {
            let (m, g) = self.prepare(point)?;
            model.push(m).map_err(|_| overflow())?;
            grid.push(g).map_err(|_| overflow())?;
            fitted.push(index).map_err(|_| overflow())?;
        }

        let transform = solve_helmert(&model, &grid)?;
        let quality = assess_quality(&transform, &model, &grid)?;

        if quality.is_underdetermined() {
            log_warn!(
                "Calibration uses only {} points: fit is exact and quality is unverified",
                quality.point_count()
            );
        }

        Ok(CalibrationResult { transform, quality, fitted })
    }

    /// Model meters and grid meters for one point
    fn prepare<Id>(&self, point: &CalibrationPoint<Id>) -> CalResult<(PlanarPoint, PlanarPoint)> {
        let model = PlanarPoint::new(
            self.units.to_meters(point.model_x),
            self.units.to_meters(point.model_y),
        );
        model.check()?;

        let gps = point.gps();
        gps.check()?;
        if !self.reference.contains(&gps) {
            log_warn!(
                "Calibration point at ({}, {}) is outside the area of use of {}",
                gps.latitude, gps.longitude, self.reference.id
            );
        }
        let grid = self.reference.project(gps)?;
        Ok((model, grid))
    }

    /// Pair each fitted point's id with its residual from `result`
    ///
    /// `points` must be the slice `result` was calibrated from, with the same
    /// active flags; otherwise `PointSetMismatch` is returned and nothing is
    /// written back.
    pub fn error_updates<Id: Clone>(
        &self,
        points: &[CalibrationPoint<Id>],
        result: &CalibrationResult,
    ) -> CalResult<PointErrorUpdates<Id>> {
        let active = points.iter().filter(|p| p.is_active).count();
        let mismatch = CalibrationError::PointSetMismatch {
            fitted: result.fitted.len(),
            active,
        };
        if active != result.fitted.len() || result.fitted.len() != result.quality.errors.len() {
            return Err(mismatch);
        }

        let mut updates = PointErrorUpdates::new();
        for (&index, &error) in result.fitted.iter().zip(result.quality.errors.iter()) {
            let point = match points.get(index) {
                Some(point) if point.is_active => point,
                _ => return Err(mismatch),
            };
            updates
                .push(PointErrorUpdate {
                    id: point.id.clone(),
                    calculated_error_m: error,
                })
                .map_err(|_| CalibrationError::TooManyPoints {
                    capacity: MAX_CALIBRATION_POINTS,
                    available: result.fitted.len(),
                })?;
        }
        Ok(updates)
    }

    /// Mapper for a transform produced with this calibrator's settings
    pub fn mapper(&self, transform: Option<HelmertTransformParams>) -> CalResult<CoordinateMapper> {
        CoordinateMapper::new(transform, self.units, self.reference)
    }
}

/// One-shot calibration from a coordinate system id and model unit
pub fn calibrate<Id>(
    points: &[CalibrationPoint<Id>],
    coordinate_system_id: &str,
    model_units: ModelUnits,
) -> CalResult<CalibrationResult> {
    let reference = lookup_reference_system(coordinate_system_id)?;
    Calibrator::new(reference, model_units).calibrate(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::FitQuality;

    fn tallinn_pair() -> [CalibrationPoint<u32>; 2] {
        [
            CalibrationPoint::new(1, 0.0, 0.0, 59.4370, 24.7536),
            CalibrationPoint::new(2, 100.0, 0.0, 59.4370, 24.7550),
        ]
    }

    #[test]
    fn two_point_scenario() {
        let result = calibrate(&tallinn_pair(), "l-est97", ModelUnits::Meters).unwrap();
        // 0.0014° of longitude at 59.437°N on GRS80 is 79.443 m
        assert!((result.transform.scale - 0.794_43).abs() < 1e-3, "scale {}", result.transform.scale);
        assert!(result.quality.rmse < 1e-6);
        assert!(result.quality.max_error < 1e-6);
        assert_eq!(result.quality.quality, FitQuality::Excellent);
        assert_eq!(result.quality.point_count(), 2);
    }

    #[test]
    fn inactive_points_excluded() {
        let mut points = [
            CalibrationPoint::new(1, 0.0, 0.0, 59.4370, 24.7536),
            CalibrationPoint::new(2, 100.0, 0.0, 59.4370, 24.7550),
            CalibrationPoint::new(3, 0.0, 100.0, 59.4379, 24.7536),
        ];
        let all = calibrate(&points, "l-est97", ModelUnits::Meters).unwrap();
        assert_eq!(all.quality.errors.len(), 3);

        points[2].is_active = false;
        let two = calibrate(&points, "l-est97", ModelUnits::Meters).unwrap();
        assert_eq!(two.quality.errors.len(), 2);
    }

    #[test]
    fn insufficient_active_points() {
        let points = [
            CalibrationPoint::new(1, 0.0, 0.0, 59.4370, 24.7536),
            CalibrationPoint::new(2, 100.0, 0.0, 59.4370, 24.7550).with_active(false),
        ];
        assert_eq!(
            calibrate(&points, "l-est97", ModelUnits::Meters),
            Err(CalibrationError::InsufficientPoints { required: 2, available: 1 })
        );
    }

    #[test]
    fn configuration_errors() {
        let points = tallinn_pair();
        assert_eq!(
            calibrate(&points, "epsg:9999", ModelUnits::Meters),
            Err(CalibrationError::UnknownReferenceSystem)
        );
        assert_eq!(
            Calibrator::from_settings("l-est97", "inches").map(|c| c.units()),
            Err(CalibrationError::UnsupportedUnit)
        );
    }

    #[test]
    fn invalid_gps_rejected() {
        let points = [
            CalibrationPoint::new(1, 0.0, 0.0, 59.4370, 24.7536),
            CalibrationPoint::new(2, 100.0, 0.0, 95.0, 24.7550),
        ];
        assert!(matches!(
            calibrate(&points, "l-est97", ModelUnits::Meters),
            Err(CalibrationError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn error_updates_follow_active_order() {
        let points = [
            CalibrationPoint::new("a", 0.0, 0.0, 59.4370, 24.7536),
            CalibrationPoint::new("b", 50.0, 50.0, 59.4375, 24.7545).with_active(false),
            CalibrationPoint::new("c", 100.0, 0.0, 59.4370, 24.7550),
            CalibrationPoint::new("d", 0.0, 100.0, 59.4379, 24.7537),
        ];
        let calibrator = Calibrator::from_settings("l-est97", "meters").unwrap();
        let result = calibrator.calibrate(&points).unwrap();
        let updates = calibrator.error_updates(&points, &result).unwrap();

        let ids: heapless::Vec<&str, 4> = updates.iter().map(|u| u.id).collect();
        assert_eq!(ids.as_slice(), &["a", "c", "d"]);
        for (update, error) in updates.iter().zip(result.quality.errors.iter()) {
            assert_eq!(update.calculated_error_m, *error);
        }
    }

    #[test]
    fn error_updates_reject_changed_active_set() {
        let mut points = [
            CalibrationPoint::new("a", 0.0, 0.0, 59.4370, 24.7536),
            CalibrationPoint::new("b", 100.0, 0.0, 59.4370, 24.7550),
            CalibrationPoint::new("c", 0.0, 100.0, 59.4379, 24.7536).with_active(false),
        ];
        let calibrator = Calibrator::from_settings("l-est97", "meters").unwrap();
        let result = calibrator.calibrate(&points).unwrap();
        assert_eq!(result.fitted.as_slice(), &[0, 1]);

        // Same active count, different points
        points[0].is_active = false;
        points[2].is_active = true;
        assert_eq!(
            calibrator.error_updates(&points, &result),
            Err(CalibrationError::PointSetMismatch { fitted: 2, active: 2 })
        );

        points[0].is_active = true;
        assert_eq!(
            calibrator.error_updates(&points, &result),
            Err(CalibrationError::PointSetMismatch { fitted: 2, active: 3 })
        );

        assert_eq!(
            calibrator.error_updates(&points[..1], &result),
            Err(CalibrationError::PointSetMismatch { fitted: 2, active: 1 })
        );
    }

    #[test]
    fn too_many_active_points() {
        let mut points: heapless::Vec<CalibrationPoint<usize>, 65> = (0..65)
            .map(|i| CalibrationPoint::new(i, i as f64, 0.0, 59.4370, 24.7536))
            .collect();
        assert_eq!(
            calibrate(&points, "l-est97", ModelUnits::Meters),
            Err(CalibrationError::TooManyPoints { capacity: 64, available: 65 })
        );

        points[64].is_active = false;
        assert!(!matches!(
            calibrate(&points, "l-est97", ModelUnits::Meters),
            Err(CalibrationError::TooManyPoints { .. })
        ));
    }

    #[test]
    fn mapper_reproduces_calibration_points() {
        let points = tallinn_pair();
        let calibrator = Calibrator::from_settings("l-est97", "meters").unwrap();
        let result = calibrator.calibrate(&points).unwrap();
        let mapper = calibrator.mapper(Some(result.transform)).unwrap();

        let geo = mapper.model_to_geographic(100.0, 0.0).unwrap();
        assert!((geo.latitude - 59.4370).abs() < 1e-9);
        assert!((geo.longitude - 24.7550).abs() < 1e-9);
    }
}
