//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the report
//! configuration and the holiday calendar from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::DeserializeOwned;

use crate::error::{ReportError, ReportResult};
use crate::models::WorkDuration;

use super::types::{
    DEFAULT_WORKER_WIDTH, HolidayCalendar, HolidaysFile, ReportConfig, ReportFile,
};

/// Loads and validates the pipeline configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/attendance/
/// ├── report.yaml    # Thresholds, receivers, pool width, retry policy
/// └── holidays.yaml  # Declared non-working dates
/// ```
///
/// # Example
///
/// ```no_run
/// use report_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/attendance").unwrap();
/// println!("thresholds: {:?}", loader.config().thresholds);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ReportConfig,
    calendar: HolidayCalendar,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing or unparseable, or if a
    /// value is unusable: empty threshold list, non-minute threshold, empty
    /// receiver list, zero worker width, or zero retry attempts.
    pub fn load<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();

        let report: ReportFile = Self::load_yaml(&path.join("report.yaml"))?;
        let holidays: HolidaysFile = Self::load_yaml(&path.join("holidays.yaml"))?;

        let config = Self::validate(report)?;
        let calendar = HolidayCalendar::from_dates(holidays.holidays);

        Ok(ConfigLoader { config, calendar })
    }

    /// The validated report configuration.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// The holiday calendar built from `holidays.yaml`.
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    fn load_yaml<T: DeserializeOwned>(path: &Path) -> ReportResult<T> {
        let contents = fs::read_to_string(path).map_err(|_| ReportError::ConfigNotFound {
            path: path.display().to_string(),
        })?;
        serde_yaml::from_str(&contents).map_err(|e| ReportError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn validate(report: ReportFile) -> ReportResult<ReportConfig> {
        if report.thresholds_hours.is_empty() {
            return Err(ReportError::ConfigInvalid {
                field: "thresholds_hours".to_string(),
                message: "at least one threshold is required".to_string(),
            });
        }

        let mut thresholds = report
            .thresholds_hours
            .iter()
            .map(|hours| Self::hours_to_duration(*hours))
            .collect::<ReportResult<Vec<_>>>()?;
        thresholds.sort();
        thresholds.dedup();

        if report.receivers.is_empty() {
            return Err(ReportError::ConfigInvalid {
                field: "receivers".to_string(),
                message: "at least one receiver address is required".to_string(),
            });
        }

        let worker_width = report.worker_width.unwrap_or(DEFAULT_WORKER_WIDTH);
        if worker_width == 0 {
            return Err(ReportError::ConfigInvalid {
                field: "worker_width".to_string(),
                message: "worker pool width must be at least 1".to_string(),
            });
        }

        let retry = report.retry.unwrap_or_default();
        if retry.max_attempts == 0 {
            return Err(ReportError::ConfigInvalid {
                field: "retry.max_attempts".to_string(),
                message: "at least one delivery attempt is required".to_string(),
            });
        }

        Ok(ReportConfig {
            thresholds,
            receivers: report.receivers,
            subject_prefix: report
                .subject_prefix
                .unwrap_or_else(|| "Attendance report".to_string()),
            group_by_sub_unit: report.group_by_sub_unit,
            worker_width,
            retry,
            output_dir: report.output_dir.unwrap_or_else(|| "data/reports".to_string()),
        })
    }

    /// Converts decimal hours (`8.5`) into a minute-granular duration.
    fn hours_to_duration(hours: Decimal) -> ReportResult<WorkDuration> {
        let minutes = hours * Decimal::from(60);
        let whole = minutes.to_u32().filter(|_| minutes.fract().is_zero());
        match whole {
            Some(m) if m > 0 => Ok(WorkDuration::from_minutes(m)),
            _ => Err(ReportError::ConfigInvalid {
                field: "thresholds_hours".to_string(),
                message: format!("threshold {hours} is not a positive whole number of minutes"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn base_report() -> ReportFile {
        ReportFile {
            thresholds_hours: vec![dec("8"), dec("8.5")],
            receivers: vec!["hr@example.com".to_string()],
            subject_prefix: None,
            group_by_sub_unit: false,
            worker_width: None,
            retry: None,
            output_dir: None,
        }
    }

    #[test]
    fn test_load_sample_config_directory() {
        let loader = ConfigLoader::load("./config/attendance").unwrap();
        let config = loader.config();
        assert_eq!(
            config.thresholds,
            vec![
                WorkDuration::from_hours_minutes(8, 0),
                WorkDuration::from_hours_minutes(8, 30)
            ]
        );
        assert!(!config.receivers.is_empty());
        assert_eq!(config.worker_width, 4);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_load_missing_directory_fails_with_config_not_found() {
        let err = ConfigLoader::load("./config/absent").unwrap_err();
        assert!(matches!(err, ReportError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_validate_converts_decimal_hours_to_minutes() {
        let config = ConfigLoader::validate(base_report()).unwrap();
        assert_eq!(config.thresholds[0].num_minutes(), 480);
        assert_eq!(config.thresholds[1].num_minutes(), 510);
    }

    #[test]
    fn test_validate_sorts_and_dedups_thresholds() {
        let mut report = base_report();
        report.thresholds_hours = vec![dec("8.5"), dec("8"), dec("8.5")];
        let config = ConfigLoader::validate(report).unwrap();
        assert_eq!(
            config.thresholds,
            vec![
                WorkDuration::from_hours_minutes(8, 0),
                WorkDuration::from_hours_minutes(8, 30)
            ]
        );
    }

    #[test]
    fn test_validate_rejects_empty_thresholds() {
        let mut report = base_report();
        report.thresholds_hours.clear();
        let err = ConfigLoader::validate(report).unwrap_err();
        assert!(matches!(
            err,
            ReportError::ConfigInvalid { ref field, .. } if field == "thresholds_hours"
        ));
    }

    #[test]
    fn test_validate_rejects_sub_minute_threshold() {
        let mut report = base_report();
        report.thresholds_hours = vec![dec("8.001")];
        assert!(ConfigLoader::validate(report).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_worker_width() {
        let mut report = base_report();
        report.worker_width = Some(0);
        let err = ConfigLoader::validate(report).unwrap_err();
        assert!(matches!(
            err,
            ReportError::ConfigInvalid { ref field, .. } if field == "worker_width"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_retry_attempts() {
        let mut report = base_report();
        report.retry = Some(RetryPolicy {
            max_attempts: 0,
            attempt_timeout_secs: 20,
        });
        assert!(ConfigLoader::validate(report).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_receivers() {
        let mut report = base_report();
        report.receivers.clear();
        assert!(ConfigLoader::validate(report).is_err());
    }
}
