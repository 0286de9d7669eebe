//! Ellipsoid Parameters and Coordinate Limits
//!
//! National grids in the registry are defined on GRS80 (ETRS89). Handheld GPS
//! reports WGS84. The two ellipsoids differ by about 0.1 mm in semi-minor axis,
//! and the datum offset is far below consumer GPS accuracy, so GPS positions
//! are projected as-is.

// ===== ELLIPSOIDS =====

/// GRS80 semi-major axis (m).
///
/// Source: IUGG 1979, used by ETRS89 national grids
pub const GRS80_SEMI_MAJOR_M: f64 = 6_378_137.0;

/// GRS80 flattening.
pub const GRS80_FLATTENING: f64 = 1.0 / 298.257_222_101;

/// WGS84 semi-major axis (m).
///
/// Source: NIMA TR8350.2
pub const WGS84_SEMI_MAJOR_M: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

// ===== GEOGRAPHIC LIMITS =====

/// Valid latitude magnitude (degrees).
pub const MAX_LATITUDE_DEG: f64 = 90.0;

/// Valid longitude magnitude (degrees).
pub const MAX_LONGITUDE_DEG: f64 = 180.0;

/// Largest longitude offset from a TM central meridian (degrees).
///
/// At 90° the series diverges; the projection rejects anything at or beyond.
pub const TM_MAX_LONGITUDE_OFFSET_DEG: f64 = 90.0;

// ===== UTM =====

/// UTM central scale factor.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;

/// UTM false easting (m).
pub const UTM_FALSE_EASTING_M: f64 = 500_000.0;
