//! Planar and geographic point types
//!
//! `PlanarPoint` is used for both model coordinates (after unit conversion)
//! and projected grid coordinates, always in meters. `GeoPoint` holds WGS84
//! degrees and only appears at the lat/lon boundary.

use crate::errors::{CalibrationError, CalResult};
use crate::constants::geodesy::{MAX_LATITUDE_DEG, MAX_LONGITUDE_DEG};

/// Point in a planar meters frame (x = easting, y = northing for grids)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarPoint {
    /// Easting or model x (m)
    pub x: f64,
    /// Northing or model y (m)
    pub y: f64,
}

impl PlanarPoint {
    /// Point from its coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &PlanarPoint) -> f64 {
        libm::hypot(self.x - other.x, self.y - other.y)
    }

    /// Rotate about the origin by `angle` radians (counter-clockwise)
    pub fn rotated(&self, angle: f64) -> PlanarPoint {
        let (sin, cos) = libm::sincos(angle);
        PlanarPoint {
            x: cos * self.x - sin * self.y,
            y: sin * self.x + cos * self.y,
        }
    }

    /// Scale both coordinates about the origin
    pub fn scaled(&self, factor: f64) -> PlanarPoint {
        PlanarPoint { x: self.x * factor, y: self.y * factor }
    }

    /// Translate by `(dx, dy)`
    pub fn offset(&self, dx: f64, dy: f64) -> PlanarPoint {
        PlanarPoint { x: self.x + dx, y: self.y + dy }
    }

    /// Neither coordinate is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Reject NaN and infinite components
    pub fn check(&self) -> CalResult<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(CalibrationError::InvalidCoordinate {
                reason: "planar coordinate is not finite",
            })
        }
    }
}

/// Arithmetic mean of a point set; `None` for an empty slice
pub fn centroid(points: &[PlanarPoint]) -> Option<PlanarPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(PlanarPoint::new(sx / n, sy / n))
}

/// WGS84 geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Degrees, positive north
    pub latitude: f64,
    /// Degrees, positive east
    pub longitude: f64,
}

impl GeoPoint {
    /// Position from latitude and longitude in degrees
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Reject non-finite values and out-of-range latitude/longitude
    pub fn check(&self) -> CalResult<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(CalibrationError::InvalidCoordinate {
                reason: "latitude/longitude is not finite",
            });
        }
        if libm::fabs(self.latitude) > MAX_LATITUDE_DEG {
            return Err(CalibrationError::InvalidCoordinate {
                reason: "latitude outside [-90, 90]",
            });
        }
        if libm::fabs(self.longitude) > MAX_LONGITUDE_DEG {
            return Err(CalibrationError::InvalidCoordinate {
                reason: "longitude outside [-180, 180]",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn rotation_quarter_turn() {
        let p = PlanarPoint::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_square() {
        let square = [
            PlanarPoint::new(0.0, 0.0),
            PlanarPoint::new(2.0, 0.0),
            PlanarPoint::new(2.0, 2.0),
            PlanarPoint::new(0.0, 2.0),
        ];
        assert_eq!(centroid(&square), Some(PlanarPoint::new(1.0, 1.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn geo_range_checks() {
        assert!(GeoPoint::new(59.437, 24.7536).check().is_ok());
        assert!(GeoPoint::new(91.0, 0.0).check().is_err());
        assert!(GeoPoint::new(0.0, -180.5).check().is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).check().is_err());
    }
}
