//! Common test utilities for calibration integration tests
//!
//! This module provides:
//! - A seeded xorshift generator with uniform and Gaussian draws
//! - Synthetic sites: a known transform, model points, and the GPS readings
//!   those points would produce with optional noise
//! - Tolerance assertions

#![allow(dead_code)]

use sitecal_core::{
    lookup_reference_system, CalibrationPoint, GeoPoint, HelmertTransformParams, ModelUnits,
    PlanarPoint, Projection, ReferenceSystem,
};

/// Tallinn old town, inside the L-EST97 area of use
pub const SITE_ORIGIN: GeoPoint = GeoPoint::new(59.4370, 24.7536);

/// Deterministic xorshift64* generator
pub struct TestRng {
    state: u64,
}

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn gen_range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// Standard normal draw (Box–Muller)
    pub fn gaussian(&mut self) -> f64 {
        let u1 = self.next_f64().max(f64::MIN_POSITIVE);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// A synthetic building site with a known model → grid transform
pub struct SyntheticSite {
    pub reference: &'static ReferenceSystem,
    pub truth: HelmertTransformParams,
}

impl SyntheticSite {
    /// Site placed at `SITE_ORIGIN` with the given rotation
    pub fn tallinn(rotation: f64) -> Self {
        let reference = lookup_reference_system("l-est97").unwrap();
        let origin = reference.project(SITE_ORIGIN).unwrap();
        Self {
            reference,
            truth: HelmertTransformParams {
                scale: 1.0,
                rotation,
                translation_x: origin.x,
                translation_y: origin.y,
            },
        }
    }

    /// GPS reading for a model position in meters, displaced on the grid by `noise`
    pub fn gps_for(&self, model_m: PlanarPoint, noise: PlanarPoint) -> GeoPoint {
        let grid = self.truth.apply(model_m).offset(noise.x, noise.y);
        self.reference.unproject(grid).unwrap()
    }

    /// Calibration points for model positions given in meters, expressed in `units`
    pub fn points(
        &self,
        model_m: &[PlanarPoint],
        units: ModelUnits,
        rng: Option<(&mut TestRng, f64)>,
    ) -> Vec<CalibrationPoint<usize>> {
        let mut rng = rng;
        model_m
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let noise = match rng.as_mut() {
                    Some((r, sigma)) => {
                        PlanarPoint::new(r.gaussian() * *sigma, r.gaussian() * *sigma)
                    }
                    None => PlanarPoint::default(),
                };
                let gps = self.gps_for(*m, noise);
                CalibrationPoint::new(
                    i,
                    units.from_meters(m.x),
                    units.from_meters(m.y),
                    gps.latitude,
                    gps.longitude,
                )
            })
            .collect()
    }
}

/// Corners and centre of a 60 m × 40 m footprint
pub fn footprint() -> Vec<PlanarPoint> {
    vec![
        PlanarPoint::new(0.0, 0.0),
        PlanarPoint::new(60.0, 0.0),
        PlanarPoint::new(60.0, 40.0),
        PlanarPoint::new(0.0, 40.0),
        PlanarPoint::new(30.0, 20.0),
    ]
}

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected, tolerance) = ($actual, $expected, $tolerance);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{} not within {} of {}",
            actual,
            tolerance,
            expected
        );
    }};
}
