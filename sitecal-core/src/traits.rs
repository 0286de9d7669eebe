//! Core traits for map projections
//!
//! Kept deliberately small: a projection only needs to go from latitude and
//! longitude to planar meters and back.

use crate::errors::CalResult;
use crate::geometry::{GeoPoint, PlanarPoint};

/// Conformal map projection between WGS84 degrees and grid meters
pub trait Projection {
    /// Geographic degrees to grid easting/northing in meters
    fn project(&self, geo: GeoPoint) -> CalResult<PlanarPoint>;

    /// Grid easting/northing in meters back to geographic degrees
    fn unproject(&self, grid: PlanarPoint) -> CalResult<GeoPoint>;
}
