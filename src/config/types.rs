//! Configuration types for the report pipeline.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from YAML configuration files, plus the [`HolidayCalendar`]
//! built from the holidays file.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::WorkDuration;

/// Retry envelope applied to the delivery step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetryPolicy {
    /// Maximum delivery attempts, including the first one.
    pub max_attempts: u32,
    /// Per-attempt timeout handed to the delivery gate, in seconds.
    pub attempt_timeout_secs: u64,
}

impl RetryPolicy {
    /// The per-attempt timeout as a [`Duration`].
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            attempt_timeout_secs: 20,
        }
    }
}

/// Raw `report.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportFile {
    /// Under-hours thresholds expressed as decimal hours (e.g. `[8, 8.5]`).
    pub thresholds_hours: Vec<Decimal>,
    /// Email addresses the report is delivered to.
    pub receivers: Vec<String>,
    /// Subject-line prefix; the period label is appended per run.
    #[serde(default)]
    pub subject_prefix: Option<String>,
    /// Whether period-level reports also break down per sub-unit.
    #[serde(default)]
    pub group_by_sub_unit: bool,
    /// Width of the aggregation worker pool.
    #[serde(default)]
    pub worker_width: Option<usize>,
    /// Delivery retry envelope.
    #[serde(default)]
    pub retry: Option<RetryPolicy>,
    /// Directory rendered artifacts are written under.
    #[serde(default)]
    pub output_dir: Option<String>,
}

/// Raw `holidays.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidaysFile {
    /// Declared non-working dates.
    pub holidays: Vec<NaiveDate>,
}

/// The validated configuration consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Under-hours thresholds, ascending and deduplicated.
    pub thresholds: Vec<WorkDuration>,
    /// Email addresses the report is delivered to.
    pub receivers: Vec<String>,
    /// Subject-line prefix; the period label is appended per run.
    pub subject_prefix: String,
    /// Whether period-level reports also break down per sub-unit.
    pub group_by_sub_unit: bool,
    /// Width of the aggregation worker pool.
    pub worker_width: usize,
    /// Delivery retry envelope.
    pub retry: RetryPolicy,
    /// Directory rendered artifacts are written under.
    pub output_dir: String,
}

/// Default worker-pool width for aggregation sub-jobs.
pub const DEFAULT_WORKER_WIDTH: usize = 4;

/// The set of declared non-working dates.
///
/// Weekends are non-working by rule; holidays come from configuration. The
/// resolver consults this calendar to decide whether a defaulted daily run
/// has anything to report, and the aggregation engine uses it to zero
/// holiday rows in period breakdowns.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use report_engine::config::HolidayCalendar;
///
/// let bastille_day = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
/// let calendar = HolidayCalendar::from_dates([bastille_day]);
/// assert!(calendar.is_holiday(bastille_day));
/// assert!(!calendar.is_workday(bastille_day)); // Monday, but a holiday
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Builds a calendar from an iterator of holiday dates.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        HolidayCalendar {
            holidays: dates.into_iter().collect(),
        }
    }

    /// True when the date is a declared holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// True when the date is a weekend day (Saturday or Sunday).
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// True when the date is a weekday and not a declared holiday.
    pub fn is_workday(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.is_holiday(date)
    }
}
