//! Solver Limits and Tolerances

/// Minimum active points for a 2D similarity fit.
///
/// Four parameters (scale, rotation, two translations) need four
/// observations, i.e. two points.
pub const MIN_CALIBRATION_POINTS: usize = 2;

/// Capacity of every point-indexed buffer.
///
/// Sites are calibrated with single digits to low tens of points.
pub const MAX_CALIBRATION_POINTS: usize = 64;

/// Smallest accepted centred model spread (m^2).
///
/// Below this the model points are treated as coincident.
pub const DEGENERATE_SPREAD_EPSILON_M2: f64 = 1e-9;

/// Iteration cap for inverse projection latitude solves.
pub const PROJECTION_MAX_ITERATIONS: usize = 20;

/// Convergence tolerance for inverse projection latitude solves (radians).
///
/// 1e-12 rad is about 6 micrometres on the ground.
pub const PROJECTION_TOLERANCE_RAD: f64 = 1e-12;
