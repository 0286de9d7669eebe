//! Ellipsoidal Transverse Mercator
//!
//! Krüger's n-series carried to sixth order, as used for UTM and most
//! national TM grids. Within a few thousand kilometres of the central
//! meridian the series is accurate to a few nanometres, well beyond what a
//! calibration needs.
//!
//! ```text
//! forward:  φ → τ = tan φ → conformal τ' → (ξ', η') → (ξ, η) via α_j → (E, N)
//! inverse:  (E, N) → (ξ, η) → (ξ', η') via β_j → τ' → τ (Newton) → φ
//! ```

use libm::{asinh, atan, atan2, atanh, cos, cosh, fabs, sin, sincos, sinh, sqrt, tan};

use crate::{
    constants::geodesy::{TM_MAX_LONGITUDE_OFFSET_DEG, UTM_FALSE_EASTING_M, UTM_SCALE_FACTOR},
    constants::solver::{PROJECTION_MAX_ITERATIONS, PROJECTION_TOLERANCE_RAD},
    errors::{CalibrationError, CalResult},
    geometry::{GeoPoint, PlanarPoint},
    traits::Projection,
};

/// Defining parameters of a TM grid (latitude of origin is the equator)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercatorParams {
    /// Ellipsoid semi-major axis (m)
    pub semi_major_m: f64,
    /// Ellipsoid flattening
    pub flattening: f64,
    /// Central meridian (degrees)
    pub central_meridian_deg: f64,
    /// Scale factor on the central meridian
    pub scale_factor: f64,
    /// Easting of the central meridian (m)
    pub false_easting_m: f64,
    /// Northing of the equator (m)
    pub false_northing_m: f64,
}

impl TransverseMercatorParams {
    /// Northern-hemisphere UTM zone given by its central meridian
    pub const fn utm_north(central_meridian_deg: f64, semi_major_m: f64, flattening: f64) -> Self {
        Self {
            semi_major_m,
            flattening,
            central_meridian_deg,
            scale_factor: UTM_SCALE_FACTOR,
            false_easting_m: UTM_FALSE_EASTING_M,
            false_northing_m: 0.0,
        }
    }
}

/// Transverse Mercator with precomputed series coefficients
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    params: TransverseMercatorParams,
    /// First eccentricity
    e: f64,
    /// Rectifying radius times the scale factor
    k0_a: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl TransverseMercator {
    /// Precompute the series coefficients
    pub fn new(params: TransverseMercatorParams) -> Self {
        let f = params.flattening;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let rectifying = params.semi_major_m / (1.0 + n)
            * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0
                - 127.0 * n5 / 288.0 + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0
                + 281.0 * n5 / 630.0 - 1_983_433.0 * n6 / 1_935_360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167_603.0 * n6 / 181_440.0,
            49561.0 * n4 / 161_280.0 - 179.0 * n5 / 168.0
                + 6_601_661.0 * n6 / 7_257_600.0,
            34729.0 * n5 / 80640.0 - 3_418_889.0 * n6 / 1_995_840.0,
            212_378_941.0 * n6 / 319_334_400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0
                - 81.0 * n5 / 512.0 + 96199.0 * n6 / 604_800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1_118_711.0 * n6 / 3_870_720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0
                + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161_280.0 - 11.0 * n5 / 504.0
                - 830_251.0 * n6 / 7_257_600.0,
            4583.0 * n5 / 161_280.0 - 108_847.0 * n6 / 3_991_680.0,
            20_648_693.0 * n6 / 638_668_800.0,
        ];

        Self {
            params,
            e: sqrt(f * (2.0 - f)),
            k0_a: params.scale_factor * rectifying,
            alpha,
            beta,
        }
    }

    /// Defining parameters
    pub fn params(&self) -> &TransverseMercatorParams {
        &self.params
    }

    /// Conformal latitude tangent τ' from geodetic tangent τ
    fn conformal_tan(&self, tau: f64) -> f64 {
        let e = self.e;
        let sigma = sinh(e * atanh(e * tau / sqrt(1.0 + tau * tau)));
        tau * sqrt(1.0 + sigma * sigma) - sigma * sqrt(1.0 + tau * tau)
    }
}

impl Projection for TransverseMercator {
    fn project(&self, geo: GeoPoint) -> CalResult<PlanarPoint> {
        geo.check()?;
        let phi = geo.latitude.to_radians();
        let mut offset = geo.longitude - self.params.central_meridian_deg;
        if offset > 180.0 {
            offset -= 360.0;
        } else if offset < -180.0 {
            offset += 360.0;
        }
        if !(fabs(offset) < TM_MAX_LONGITUDE_OFFSET_DEG) {
            return Err(CalibrationError::InvalidCoordinate {
                reason: "longitude 90 degrees or more from the central meridian",
            });
        }
        let lambda = offset.to_radians();
        let (sin_l, cos_l) = sincos(lambda);

        let tau_p = self.conformal_tan(tan(phi));
        let xi_p = atan2(tau_p, cos_l);
        let eta_p = asinh(sin_l / sqrt(tau_p * tau_p + cos_l * cos_l));

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * sin(k * xi_p) * cosh(k * eta_p);
            eta += a * cos(k * xi_p) * sinh(k * eta_p);
        }

        Ok(PlanarPoint::new(
            self.params.false_easting_m + self.k0_a * eta,
            self.params.false_northing_m + self.k0_a * xi,
        ))
    }

    fn unproject(&self, grid: PlanarPoint) -> CalResult<GeoPoint> {
        grid.check()?;
        let xi = (grid.y - self.params.false_northing_m) / self.k0_a;
        let eta = (grid.x - self.params.false_easting_m) / self.k0_a;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * sin(k * xi) * cosh(k * eta);
            eta_p -= b * cos(k * xi) * sinh(k * eta);
        }

        let sinh_eta_p = sinh(eta_p);
        let (sin_xi_p, cos_xi_p) = sincos(xi_p);
        let tau_p = sin_xi_p / sqrt(sinh_eta_p * sinh_eta_p + cos_xi_p * cos_xi_p);

        // Newton on τ'(τ) = tau_p
        let one_minus_e2 = 1.0 - self.e * self.e;
        let mut tau = tau_p;
        let mut converged = false;
        for _ in 0..PROJECTION_MAX_ITERATIONS {
            let tau_i_p = self.conformal_tan(tau);
            let delta = (tau_p - tau_i_p) / sqrt(1.0 + tau_i_p * tau_i_p)
                * (1.0 + one_minus_e2 * tau * tau)
                / (one_minus_e2 * sqrt(1.0 + tau * tau));
            tau += delta;
            if fabs(delta) < PROJECTION_TOLERANCE_RAD {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(CalibrationError::ProjectionDiverged);
        }

        let lambda = atan2(sinh_eta_p, cos_xi_p);
        Ok(GeoPoint::new(
            atan(tau).to_degrees(),
            self.params.central_meridian_deg + lambda.to_degrees(),
        ))
    }
}
