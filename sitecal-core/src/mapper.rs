//! Coordinate Mapper
//!
//! Forward and inverse application of a persisted calibration:
//!
//! ```text
//! model → geographic:  model units ─×factor→ model m ─T→ grid m ─unproject→ lat/lon
//! geographic → model:  lat/lon ─project→ grid m ─T⁻¹→ model m ─÷factor→ model units
//! ```
//!
//! Round trips agree to well under a micrometre inside the reference
//! system's area of use.

use crate::{
    errors::{CalibrationError, CalResult},
    geometry::{GeoPoint, PlanarPoint},
    helmert::HelmertTransformParams,
    reference::ReferenceSystem,
    traits::Projection,
    units::ModelUnits,
};

/// A calibrated transform bound to its units and reference system
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    transform: HelmertTransformParams,
    units: ModelUnits,
    reference: &'static ReferenceSystem,
}

impl CoordinateMapper {
    /// Bind a stored transform; `None` means the project is not calibrated
    pub fn new(
        transform: Option<HelmertTransformParams>,
        units: ModelUnits,
        reference: &'static ReferenceSystem,
    ) -> CalResult<Self> {
        let transform = transform.ok_or(CalibrationError::NotCalibrated)?;
        if !transform.is_valid() {
            return Err(CalibrationError::NotCalibrated);
        }
        Ok(Self { transform, units, reference })
    }

    /// Bound transform
    pub fn transform(&self) -> &HelmertTransformParams {
        &self.transform
    }

    /// Model unit of inputs and outputs
    pub fn units(&self) -> ModelUnits {
        self.units
    }

    /// Grid the transform targets
    pub fn reference(&self) -> &'static ReferenceSystem {
        self.reference
    }

    /// Model coordinates (model units) to grid meters
    pub fn model_to_grid(&self, model_x: f64, model_y: f64) -> CalResult<PlanarPoint> {
        let model = PlanarPoint::new(self.units.to_meters(model_x), self.units.to_meters(model_y));
        model.check()?;
        Ok(self.transform.apply(model))
    }

    /// Grid meters to model coordinates (model units)
    pub fn grid_to_model(&self, grid: PlanarPoint) -> CalResult<(f64, f64)> {
        grid.check()?;
        let model = self.transform.apply_inverse(grid);
        Ok((self.units.from_meters(model.x), self.units.from_meters(model.y)))
    }

    /// Model coordinates to WGS84 latitude/longitude (degrees)
    pub fn model_to_geographic(&self, model_x: f64, model_y: f64) -> CalResult<GeoPoint> {
        let grid = self.model_to_grid(model_x, model_y)?;
        self.reference.unproject(grid)
    }

    /// WGS84 latitude/longitude (degrees) to model coordinates
    pub fn geographic_to_model(&self, latitude: f64, longitude: f64) -> CalResult<(f64, f64)> {
        let grid = self.reference.project(GeoPoint::new(latitude, longitude))?;
        self.grid_to_model(grid)
    }
}

/// One-shot model → geographic conversion
pub fn model_to_geographic(
    model_x: f64,
    model_y: f64,
    unit: ModelUnits,
    transform: Option<&HelmertTransformParams>,
    reference: &'static ReferenceSystem,
) -> CalResult<(f64, f64)> {
    let geo = CoordinateMapper::new(transform.copied(), unit, reference)?
        .model_to_geographic(model_x, model_y)?;
    Ok((geo.latitude, geo.longitude))
}

/// One-shot geographic → model conversion
pub fn geographic_to_model(
    latitude: f64,
    longitude: f64,
    unit: ModelUnits,
    transform: Option<&HelmertTransformParams>,
    reference: &'static ReferenceSystem,
) -> CalResult<(f64, f64)> {
    CoordinateMapper::new(transform.copied(), unit, reference)?
        .geographic_to_model(latitude, longitude)
}
