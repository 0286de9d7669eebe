//! Lambert Conformal Conic with two standard parallels (ellipsoidal)
//!
//! Forward is closed form. The inverse recovers latitude by fixed-point
//! iteration on the isometric latitude, which contracts by roughly e² per
//! step and settles in five or six iterations.
//!
//! ```text
//! m(φ) = cos φ / √(1 − e² sin² φ)
//! t(φ) = tan(π/4 − φ/2) / ((1 − e sin φ)/(1 + e sin φ))^(e/2)
//! n    = (ln m₁ − ln m₂) / (ln t₁ − ln t₂)
//! F    = m₁ / (n t₁ⁿ)
//! r(φ) = a F t(φ)ⁿ,   θ = n (λ − λ₀)
//! E    = FE + r sin θ,   N = FN + r₀ − r cos θ
//! ```

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use libm::{atan, atan2, fabs, log, pow, sin, sincos, sqrt, tan};

use crate::{
    constants::solver::{PROJECTION_MAX_ITERATIONS, PROJECTION_TOLERANCE_RAD},
    errors::{CalibrationError, CalResult},
    geometry::{GeoPoint, PlanarPoint},
    traits::Projection,
};

/// Defining parameters of a two-parallel LCC grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertParams {
    /// Ellipsoid semi-major axis (m)
    pub semi_major_m: f64,
    /// Ellipsoid flattening
    pub flattening: f64,
    /// First standard parallel (degrees)
    pub standard_parallel_1_deg: f64,
    /// Second standard parallel (degrees)
    pub standard_parallel_2_deg: f64,
    /// Latitude of false origin (degrees)
    pub latitude_of_origin_deg: f64,
    /// Longitude of false origin (degrees)
    pub longitude_of_origin_deg: f64,
    /// Easting at the false origin (m)
    pub false_easting_m: f64,
    /// Northing at the false origin (m)
    pub false_northing_m: f64,
}

/// Lambert Conformal Conic with precomputed cone constants
#[derive(Debug, Clone)]
pub struct LambertConformalConic {
    params: LambertParams,
    e: f64,
    /// Cone constant
    n: f64,
    /// a·F
    a_f: f64,
    /// Radius at the latitude of origin
    r0: f64,
}

impl LambertConformalConic {
    /// Derive the cone constants from the defining parameters
    pub fn new(params: LambertParams) -> Self {
        let f = params.flattening;
        let e = sqrt(f * (2.0 - f));
        let phi1 = params.standard_parallel_1_deg.to_radians();
        let phi2 = params.standard_parallel_2_deg.to_radians();
        let phi0 = params.latitude_of_origin_deg.to_radians();

        let m1 = m_factor(e, phi1);
        let m2 = m_factor(e, phi2);
        let t1 = t_factor(e, phi1);
        let t2 = t_factor(e, phi2);

        let n = (log(m1) - log(m2)) / (log(t1) - log(t2));
        let a_f = params.semi_major_m * m1 / (n * pow(t1, n));
        let r0 = a_f * pow(t_factor(e, phi0), n);

        Self { params, e, n, a_f, r0 }
    }

    /// Defining parameters
    pub fn params(&self) -> &LambertParams {
        &self.params
    }

    /// Cone constant, also the meridian convergence per radian of longitude
    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}

fn m_factor(e: f64, phi: f64) -> f64 {
    let (sin_phi, cos_phi) = sincos(phi);
    cos_phi / sqrt(1.0 - e * e * sin_phi * sin_phi)
}

fn t_factor(e: f64, phi: f64) -> f64 {
    let e_sin = e * sin(phi);
    tan(FRAC_PI_4 - phi / 2.0) / pow((1.0 - e_sin) / (1.0 + e_sin), e / 2.0)
}

impl Projection for LambertConformalConic {
    fn project(&self, geo: GeoPoint) -> CalResult<PlanarPoint> {
        geo.check()?;
        let phi = geo.latitude.to_radians();
        let r = self.a_f * pow(t_factor(self.e, phi), self.n);
        let theta = self.n * (geo.longitude - self.params.longitude_of_origin_deg).to_radians();
        let (sin_t, cos_t) = sincos(theta);

        Ok(PlanarPoint::new(
            self.params.false_easting_m + r * sin_t,
            self.params.false_northing_m + self.r0 - r * cos_t,
        ))
    }

    fn unproject(&self, grid: PlanarPoint) -> CalResult<GeoPoint> {
        grid.check()?;
        let dx = grid.x - self.params.false_easting_m;
        let dy = self.r0 - (grid.y - self.params.false_northing_m);

        let sign = if self.n < 0.0 { -1.0 } else { 1.0 };
        let r = sign * sqrt(dx * dx + dy * dy);
        let t = pow(r / self.a_f, 1.0 / self.n);
        let theta = atan2(sign * dx, sign * dy);

        let half_e = self.e / 2.0;
        let mut phi = FRAC_PI_2 - 2.0 * atan(t);
        let mut converged = false;
        for _ in 0..PROJECTION_MAX_ITERATIONS {
            let e_sin = self.e * sin(phi);
            let next = FRAC_PI_2 - 2.0 * atan(t * pow((1.0 - e_sin) / (1.0 + e_sin), half_e));
            let delta = next - phi;
            phi = next;
            if fabs(delta) < PROJECTION_TOLERANCE_RAD {
                converged = true;
                break;
            }
        }
        if !converged || !phi.is_finite() {
            return Err(CalibrationError::ProjectionDiverged);
        }

        Ok(GeoPoint::new(
            phi.to_degrees(),
            self.params.longitude_of_origin_deg + (theta / self.n).to_degrees(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::geodesy::{GRS80_FLATTENING, GRS80_SEMI_MAJOR_M};

    fn estonia() -> LambertConformalConic {
        LambertConformalConic::new(LambertParams {
            semi_major_m: GRS80_SEMI_MAJOR_M,
            flattening: GRS80_FLATTENING,
            standard_parallel_1_deg: 59.0 + 20.0 / 60.0,
            standard_parallel_2_deg: 58.0,
            latitude_of_origin_deg: 57.0 + 31.0 / 60.0 + 3.19415 / 3600.0,
            longitude_of_origin_deg: 24.0,
            false_easting_m: 500_000.0,
            false_northing_m: 6_375_000.0,
        })
    }

    #[test]
    fn tallinn_grid_position() {
        let lcc = estonia();
        let grid = lcc.project(GeoPoint::new(59.4370, 24.7536)).unwrap();
        assert!((grid.x - 542_763.37).abs() < 0.05, "easting {}", grid.x);
        assert!((grid.y - 6_589_036.28).abs() < 0.05, "northing {}", grid.y);
    }

    #[test]
    fn origin_maps_to_false_origin() {
        let lcc = estonia();
        let p = lcc.params();
        let grid = lcc
            .project(GeoPoint::new(p.latitude_of_origin_deg, p.longitude_of_origin_deg))
            .unwrap();
        assert!((grid.x - 500_000.0).abs() < 1e-6);
        assert!((grid.y - 6_375_000.0).abs() < 1e-6);
    }

    #[test]
    fn round_trip_across_estonia() {
        let lcc = estonia();
        for &(lat, lon) in &[(59.437, 24.7536), (57.6, 27.3), (58.9, 22.0)] {
            let grid = lcc.project(GeoPoint::new(lat, lon)).unwrap();
            let back = lcc.unproject(grid).unwrap();
            assert!((back.latitude - lat).abs() < 1e-10);
            assert!((back.longitude - lon).abs() < 1e-10);
            assert!(lcc.project(back).unwrap().distance(&grid) < 1e-6);
        }
    }

    #[test]
    fn cone_constant_between_parallels() {
        let n = estonia().cone_constant();
        assert!((n - 0.854_175_858).abs() < 1e-8);
    }
}
