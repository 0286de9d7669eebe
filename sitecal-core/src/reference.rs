//! Reference System Registry
//!
//! Fixed table of projected coordinate reference systems a project can be
//! calibrated against. Lookups are by the string id stored in the project's
//! coordinate settings; an unknown id is an error, never a silent default.
//!
//! ```rust
//! use sitecal_core::reference::lookup_reference_system;
//!
//! let est = lookup_reference_system("l-est97")?;
//! assert_eq!(est.epsg_code, 3301);
//! assert_eq!(est.region, "Estonia");
//! # Ok::<(), sitecal_core::CalibrationError>(())
//! ```

use crate::{
    constants::geodesy::{
        GRS80_FLATTENING, GRS80_SEMI_MAJOR_M, WGS84_FLATTENING, WGS84_SEMI_MAJOR_M,
    },
    errors::{CalibrationError, CalResult},
    geometry::{GeoPoint, PlanarPoint},
    projection::{LambertParams, ProjectionDef, TransverseMercatorParams},
    traits::Projection,
};

/// Geographic area of use, degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Southern limit (degrees)
    pub south: f64,
    /// Northern limit (degrees)
    pub north: f64,
    /// Western limit (degrees)
    pub west: f64,
    /// Eastern limit (degrees)
    pub east: f64,
}

impl GeoBounds {
    /// Inclusive bounds test
    pub fn contains(&self, geo: &GeoPoint) -> bool {
        geo.latitude >= self.south
            && geo.latitude <= self.north
            && geo.longitude >= self.west
            && geo.longitude <= self.east
    }
}

/// One entry of the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceSystem {
    /// Id stored in project settings (e.g. "l-est97")
    pub id: &'static str,
    /// Human readable name
    pub name: &'static str,
    /// EPSG registry code
    pub epsg_code: u32,
    /// Where the system applies
    pub region: &'static str,
    /// Area of use
    pub bounds: GeoBounds,
    /// Projection defining the grid
    pub projection: ProjectionDef,
}

impl ReferenceSystem {
    /// True when the position lies inside the area of use
    pub fn contains(&self, geo: &GeoPoint) -> bool {
        self.bounds.contains(geo)
    }
}

impl Projection for ReferenceSystem {
    fn project(&self, geo: GeoPoint) -> CalResult<PlanarPoint> {
        self.projection.project(geo)
    }

    fn unproject(&self, grid: PlanarPoint) -> CalResult<GeoPoint> {
        self.projection.unproject(grid)
    }
}

const fn tm_grs80(central_meridian_deg: f64, scale_factor: f64, false_northing_m: f64) -> ProjectionDef {
    ProjectionDef::TransverseMercator(TransverseMercatorParams {
        semi_major_m: GRS80_SEMI_MAJOR_M,
        flattening: GRS80_FLATTENING,
        central_meridian_deg,
        scale_factor,
        false_easting_m: 500_000.0,
        false_northing_m,
    })
}

/// Every supported reference system
pub static REFERENCE_SYSTEMS: [ReferenceSystem; 8] = [
    ReferenceSystem {
        id: "l-est97",
        name: "Estonian Coordinate System of 1997",
        epsg_code: 3301,
        region: "Estonia",
        bounds: GeoBounds { south: 57.52, north: 60.00, west: 21.74, east: 28.20 },
        projection: ProjectionDef::LambertConformalConic(LambertParams {
            semi_major_m: GRS80_SEMI_MAJOR_M,
            flattening: GRS80_FLATTENING,
            standard_parallel_1_deg: 59.0 + 20.0 / 60.0,
            standard_parallel_2_deg: 58.0,
            latitude_of_origin_deg: 57.0 + 31.0 / 60.0 + 3.19415 / 3600.0,
            longitude_of_origin_deg: 24.0,
            false_easting_m: 500_000.0,
            false_northing_m: 6_375_000.0,
        }),
    },
    ReferenceSystem {
        id: "lks-92",
        name: "LKS-92 / Latvia TM",
        epsg_code: 3059,
        region: "Latvia",
        bounds: GeoBounds { south: 55.67, north: 58.09, west: 20.87, east: 28.24 },
        projection: tm_grs80(24.0, 0.9996, -6_000_000.0),
    },
    ReferenceSystem {
        id: "lks-94",
        name: "LKS-94 / Lithuania TM",
        epsg_code: 3346,
        region: "Lithuania",
        bounds: GeoBounds { south: 53.89, north: 56.45, west: 19.02, east: 26.82 },
        projection: tm_grs80(24.0, 0.9998, 0.0),
    },
    ReferenceSystem {
        id: "etrs-tm35fin",
        name: "ETRS89 / TM35FIN(E,N)",
        epsg_code: 3067,
        region: "Finland",
        bounds: GeoBounds { south: 58.84, north: 70.09, west: 19.08, east: 31.59 },
        projection: tm_grs80(27.0, 0.9996, 0.0),
    },
    ReferenceSystem {
        id: "sweref99-tm",
        name: "SWEREF99 TM",
        epsg_code: 3006,
        region: "Sweden",
        bounds: GeoBounds { south: 54.96, north: 69.07, west: 10.03, east: 24.17 },
        projection: tm_grs80(15.0, 0.9996, 0.0),
    },
    ReferenceSystem {
        id: "etrs89-utm34n",
        name: "ETRS89 / UTM zone 34N",
        epsg_code: 25834,
        region: "Europe 18°E to 24°E",
        bounds: GeoBounds { south: 0.0, north: 84.0, west: 18.0, east: 24.0 },
        projection: ProjectionDef::TransverseMercator(TransverseMercatorParams::utm_north(
            21.0,
            GRS80_SEMI_MAJOR_M,
            GRS80_FLATTENING,
        )),
    },
    ReferenceSystem {
        id: "etrs89-utm35n",
        name: "ETRS89 / UTM zone 35N",
        epsg_code: 25835,
        region: "Europe 24°E to 30°E",
        bounds: GeoBounds { south: 0.0, north: 84.0, west: 24.0, east: 30.0 },
        projection: ProjectionDef::TransverseMercator(TransverseMercatorParams::utm_north(
            27.0,
            GRS80_SEMI_MAJOR_M,
            GRS80_FLATTENING,
        )),
    },
    ReferenceSystem {
        id: "wgs84-utm35n",
        name: "WGS 84 / UTM zone 35N",
        epsg_code: 32635,
        region: "World 24°E to 30°E, northern hemisphere",
        bounds: GeoBounds { south: 0.0, north: 84.0, west: 24.0, east: 30.0 },
        projection: ProjectionDef::TransverseMercator(TransverseMercatorParams::utm_north(
            27.0,
            WGS84_SEMI_MAJOR_M,
            WGS84_FLATTENING,
        )),
    },
];

/// Find a reference system by id
pub fn lookup_reference_system(id: &str) -> CalResult<&'static ReferenceSystem> {
    REFERENCE_SYSTEMS
        .iter()
        .find(|system| system.id == id)
        .ok_or(CalibrationError::UnknownReferenceSystem)
}

/// Find a reference system by EPSG code
pub fn lookup_by_epsg(epsg_code: u32) -> CalResult<&'static ReferenceSystem> {
    REFERENCE_SYSTEMS
        .iter()
        .find(|system| system.epsg_code == epsg_code)
        .ok_or(CalibrationError::UnknownReferenceSystem)
}

/// Iterate the registry in table order
pub fn reference_systems() -> impl Iterator<Item = &'static ReferenceSystem> {
    REFERENCE_SYSTEMS.iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_ids() {
        let lks = lookup_reference_system("lks-92").unwrap();
        assert_eq!(lks.epsg_code, 3059);
        assert_eq!(lookup_by_epsg(3067).unwrap().id, "etrs-tm35fin");
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert_eq!(
            lookup_reference_system("EPSG:3301"),
            Err(CalibrationError::UnknownReferenceSystem)
        );
        assert!(lookup_by_epsg(4326).is_err());
    }

    #[test]
    fn ids_and_codes_are_unique() {
        for (i, a) in REFERENCE_SYSTEMS.iter().enumerate() {
            for b in &REFERENCE_SYSTEMS[i + 1..] {
                assert_ne!(a.id, b.id);
                assert_ne!(a.epsg_code, b.epsg_code);
            }
        }
    }

    #[test]
    fn every_system_round_trips_at_its_centre() {
        for system in reference_systems() {
            let b = system.bounds;
            let centre = GeoPoint::new(
                (b.south.max(40.0) + b.north.min(70.0)) / 2.0,
                (b.west + b.east) / 2.0,
            );
            assert!(system.contains(&centre), "{}", system.id);
            let grid = system.project(centre).unwrap();
            let back = system.unproject(grid).unwrap();
            assert!((back.latitude - centre.latitude).abs() < 1e-9, "{}", system.id);
            assert!((back.longitude - centre.longitude).abs() < 1e-9, "{}", system.id);
        }
    }

    #[test]
    fn area_of_use() {
        let est = lookup_reference_system("l-est97").unwrap();
        assert!(est.contains(&GeoPoint::new(59.437, 24.7536)));
        assert!(!est.contains(&GeoPoint::new(52.52, 13.405)));
    }
}
