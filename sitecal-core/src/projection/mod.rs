//! Map Projections for Site Calibration
//!
//! ## Overview
//!
//! A Helmert fit is a planar similarity, so GPS latitude/longitude must first
//! be carried into a planar meters frame. Each entry of the reference system
//! registry names the conformal projection that defines its grid. Conformal
//! projections keep shapes locally, so over a building site the grid differs
//! from true ground distances only by a near-unity scale and a small rotation.
//! The similarity transform absorbs both.
//!
//! ## Supported Projections
//!
//! | Projection | Used by |
//! |---|---|
//! | Transverse Mercator | UTM zones, LKS-92, LKS-94, TM35FIN, SWEREF 99 TM |
//! | Lambert Conformal Conic (2SP) | L-EST97 |
//!
//! Projection objects hold only derived constants and are rebuilt per call
//! from the static definitions; construction is a handful of floating-point
//! operations and nothing is cached between calls.

mod lambert;
mod transverse_mercator;

pub use lambert::{LambertConformalConic, LambertParams};
pub use transverse_mercator::{TransverseMercator, TransverseMercatorParams};

use crate::errors::CalResult;
use crate::geometry::{GeoPoint, PlanarPoint};
use crate::traits::Projection;

/// Static projection definition stored in the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionDef {
    /// Transverse Mercator grid
    TransverseMercator(TransverseMercatorParams),
    /// Lambert Conformal Conic with two standard parallels
    LambertConformalConic(LambertParams),
}

impl Projection for ProjectionDef {
    fn project(&self, geo: GeoPoint) -> CalResult<PlanarPoint> {
        match self {
            Self::TransverseMercator(params) => TransverseMercator::new(*params).project(geo),
            Self::LambertConformalConic(params) => LambertConformalConic::new(*params).project(geo),
        }
    }

    fn unproject(&self, grid: PlanarPoint) -> CalResult<GeoPoint> {
        match self {
            Self::TransverseMercator(params) => TransverseMercator::new(*params).unproject(grid),
            Self::LambertConformalConic(params) => LambertConformalConic::new(*params).unproject(grid),
        }
    }
}
