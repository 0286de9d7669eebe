//! Project coordinate settings record
//!
//! One record per project. `coordinate_system_id` and `model_units` are kept
//! as the raw strings the storage layer holds and are parsed strictly on use:
//! an unknown id or unit is reported, never replaced by a default.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use sitecal_core::constants::MIN_CALIBRATION_POINTS;
use sitecal_core::{
    CalibrationPoint, CalibrationQuality, CalibrationResult, Calibrator, CoordinateMapper,
    FitQuality, HelmertTransformParams, PointErrorUpdate,
};

use crate::{RecordError, RecordResult};

/// Whether a project has a usable calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    #[default]
    NotCalibrated,
    Calibrated,
}

impl CalibrationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotCalibrated => "not_calibrated",
            Self::Calibrated => "calibrated",
        }
    }
}

impl FromStr for CalibrationStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_calibrated" => Ok(Self::NotCalibrated),
            "calibrated" => Ok(Self::Calibrated),
            other => Err(RecordError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored subset of a `CalibrationQuality`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSummary {
    /// Root-mean-square residual (m)
    pub rmse: f64,
    /// Largest residual (m)
    pub max_error: f64,
    pub quality: FitQuality,
    /// Active points in the fit; 2 means the class is unverified
    pub point_count: usize,
}

impl From<&CalibrationQuality> for CalibrationSummary {
    fn from(quality: &CalibrationQuality) -> Self {
        Self {
            rmse: quality.rmse,
            max_error: quality.max_error,
            quality: quality.quality,
            point_count: quality.point_count(),
        }
    }
}

impl CalibrationSummary {
    /// Exact two-point fit whose class says nothing about GPS accuracy
    pub fn is_underdetermined(&self) -> bool {
        self.point_count <= MIN_CALIBRATION_POINTS
    }
}

/// Per-project coordinate settings and last calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCoordinateSettings {
    pub project_id: String,
    /// Reference system registry id (e.g. "l-est97")
    pub coordinate_system_id: String,
    /// "millimeters", "centimeters" or "meters"
    pub model_units: String,
    #[serde(default)]
    pub calibration_status: CalibrationStatus,
    #[serde(default)]
    pub transform: Option<HelmertTransformParams>,
    #[serde(default)]
    pub quality: Option<CalibrationSummary>,
}

/// Everything a successful calibration hands back to the storage layer
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome<Id> {
    /// Settings with the new transform and summary applied
    pub settings: ProjectCoordinateSettings,
    /// Full result, including per-point residuals
    pub result: CalibrationResult,
    /// `calculated_error_m` write-back, one per active point
    pub point_updates: Vec<PointErrorUpdate<Id>>,
}

impl ProjectCoordinateSettings {
    /// Uncalibrated settings for a project
    pub fn new(project_id: &str, coordinate_system_id: &str, model_units: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            coordinate_system_id: coordinate_system_id.to_string(),
            model_units: model_units.to_string(),
            calibration_status: CalibrationStatus::NotCalibrated,
            transform: None,
            quality: None,
        }
    }

    /// Calibrator for this project's reference system and units
    pub fn calibrator(&self) -> RecordResult<Calibrator> {
        Ok(Calibrator::from_settings(&self.coordinate_system_id, &self.model_units)?)
    }

    /// Fit the active points and return updated settings
    ///
    /// `self` is not modified; persist `outcome.settings` to commit.
    pub fn calibrate<Id: Clone>(&self, points: &[CalibrationPoint<Id>]) -> RecordResult<CalibrationOutcome<Id>> {
        let calibrator = self.calibrator()?;
        let result = calibrator.calibrate(points)?;
        let point_updates = calibrator.error_updates(points, &result)?.into_iter().collect();

        let mut settings = self.clone();
        settings.apply(&result);

        Ok(CalibrationOutcome { settings, result, point_updates })
    }

    /// Store a calibration result on this record
    pub fn apply(&mut self, result: &CalibrationResult) {
        self.transform = Some(result.transform);
        self.quality = Some(CalibrationSummary::from(&result.quality));
        self.calibration_status = CalibrationStatus::Calibrated;
        log::debug!(
            "Project {} calibrated: rmse={}m quality={} points={}",
            self.project_id,
            result.quality.rmse,
            result.quality.quality,
            result.quality.point_count()
        );
    }

    /// Drop the calibration, e.g. after the reference system changes
    pub fn reset(&mut self) {
        self.transform = None;
        self.quality = None;
        self.calibration_status = CalibrationStatus::NotCalibrated;
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration_status == CalibrationStatus::Calibrated && self.transform.is_some()
    }

    /// Mapper for the stored transform; `NotCalibrated` until a fit is applied
    pub fn mapper(&self) -> RecordResult<CoordinateMapper> {
        let transform = if self.calibration_status == CalibrationStatus::Calibrated {
            self.transform
        } else {
            None
        };
        Ok(self.calibrator()?.mapper(transform)?)
    }

    pub fn to_json(&self) -> RecordResult<String> {
        serde_json::to_string(self).map_err(|e| RecordError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> RecordResult<Self> {
        serde_json::from_str(json).map_err(|e| RecordError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecal_core::CalibrationError;

    fn points() -> Vec<CalibrationPoint<String>> {
        vec![
            CalibrationPoint::new("a".into(), 0.0, 0.0, 59.4370, 24.7536),
            CalibrationPoint::new("b".into(), 100_000.0, 0.0, 59.4370, 24.7550),
            CalibrationPoint::new("c".into(), 0.0, 100_000.0, 59.437713, 24.7536),
            CalibrationPoint::new("d".into(), 50_000.0, 50_000.0, 59.4390, 24.7560)
                .with_active(false),
        ]
    }

    #[test]
    fn calibrate_produces_updated_copy() {
        let settings = ProjectCoordinateSettings::new("p", "l-est97", "millimeters");
        let outcome = settings.calibrate(&points()).unwrap();

        assert_eq!(settings.calibration_status, CalibrationStatus::NotCalibrated);
        assert!(outcome.settings.is_calibrated());
        let summary = outcome.settings.quality.unwrap();
        assert_eq!(summary.point_count, 3);
        assert!(!summary.is_underdetermined());

        let ids: Vec<&str> = outcome.point_updates.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn two_point_summary_is_underdetermined() {
        let settings = ProjectCoordinateSettings::new("p", "l-est97", "millimeters");
        let outcome = settings.calibrate(&points()[..2]).unwrap();
        let summary = outcome.settings.quality.unwrap();
        assert_eq!(summary.point_count, 2);
        assert!(summary.is_underdetermined());
        assert_eq!(summary.quality, FitQuality::Excellent);
    }

    #[test]
    fn failed_calibration_keeps_previous_record() {
        let settings = ProjectCoordinateSettings::new("p", "l-est97", "millimeters");
        let calibrated = settings.calibrate(&points()).unwrap().settings;

        let too_few = &points()[..1];
        let err = calibrated.calibrate(too_few).unwrap_err();
        assert_eq!(
            err.calibration(),
            Some(CalibrationError::InsufficientPoints { required: 2, available: 1 })
        );
        assert!(calibrated.is_calibrated());
    }

    #[test]
    fn bad_configuration_is_reported() {
        let unit = ProjectCoordinateSettings::new("p", "l-est97", "feet");
        assert_eq!(
            unit.calibrate(&points()).unwrap_err().calibration(),
            Some(CalibrationError::UnsupportedUnit)
        );

        let crs = ProjectCoordinateSettings::new("p", "gk-krueger", "meters");
        assert_eq!(
            crs.calibrate(&points()).unwrap_err().calibration(),
            Some(CalibrationError::UnknownReferenceSystem)
        );
    }

    #[test]
    fn mapper_requires_calibration() {
        let mut settings = ProjectCoordinateSettings::new("p", "l-est97", "millimeters");
        assert_eq!(
            settings.mapper().unwrap_err().calibration(),
            Some(CalibrationError::NotCalibrated)
        );

        settings = settings.calibrate(&points()).unwrap().settings;
        assert!(settings.mapper().is_ok());

        settings.reset();
        assert!(!settings.is_calibrated());
        assert!(settings.mapper().is_err());
    }

    #[test]
    fn json_round_trip() {
        let settings = ProjectCoordinateSettings::new("p", "l-est97", "millimeters")
            .calibrate(&points())
            .unwrap()
            .settings;
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"calibration_status\":\"calibrated\""));
        assert!(json.contains("\"point_count\":3"));

        let restored = ProjectCoordinateSettings::from_json(&json).unwrap();
        assert_eq!(restored, settings);
    }

    #[test]
    fn minimal_json_defaults_to_uncalibrated() {
        let json = r#"{"project_id":"p","coordinate_system_id":"lks-92","model_units":"meters"}"#;
        let settings = ProjectCoordinateSettings::from_json(json).unwrap();
        assert_eq!(settings.calibration_status, CalibrationStatus::NotCalibrated);
        assert!(settings.transform.is_none());
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = ProjectCoordinateSettings::from_json("{\"project_id\": 3}").unwrap_err();
        assert!(matches!(err, RecordError::Decode(_)));
    }

    #[test]
    fn status_strings() {
        assert_eq!("calibrated".parse::<CalibrationStatus>().unwrap(), CalibrationStatus::Calibrated);
        assert!(matches!(
            "pending".parse::<CalibrationStatus>(),
            Err(RecordError::InvalidStatus(_))
        ));
    }
}
