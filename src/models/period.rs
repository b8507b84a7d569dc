//! Reporting period models.
//!
//! This module defines the report cadence ([`ReportKind`]) and the concrete
//! resolved date range a single run covers ([`DateRange`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// The cadence of a report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// One working day.
    Daily,
    /// The most recently completed Monday-Friday span.
    Weekly,
    /// A full calendar month.
    Monthly,
    /// A full calendar quarter.
    Quarterly,
    /// A full calendar year.
    Yearly,
}

impl ReportKind {
    /// Human-readable name used in labels and subjects.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Weekly => "weekly",
            ReportKind::Monthly => "monthly",
            ReportKind::Quarterly => "quarterly",
            ReportKind::Yearly => "yearly",
        }
    }
}

/// A concrete, resolved reporting period.
///
/// Created once per run by the period resolver and never mutated afterwards.
/// The range is inclusive on both ends and deliberately keeps weekends and
/// holidays inside it: business-calendar exclusion is the aggregation
/// engine's job, not period arithmetic's. The `label` is deterministic for a
/// given kind and span, so artifacts named from it overwrite across re-runs
/// instead of accumulating.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use report_engine::models::DateRange;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2025, 7, 7).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 7, 11).unwrap(),
///     "weekly-2025-07-07_2025-07-11",
/// ).unwrap();
/// assert_eq!(range.num_days(), 5);
/// assert!(!range.holiday);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// The first date of the period (inclusive).
    pub start: NaiveDate,
    /// The last date of the period (inclusive).
    pub end: NaiveDate,
    /// Deterministic human-readable label, e.g. `daily-2025-07-11`.
    pub label: String,
    /// True when a single-day period landed on a configured holiday.
    /// The orchestrator short-circuits delivery for holiday ranges.
    #[serde(default)]
    pub holiday: bool,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> ReportResult<Self> {
        if start > end {
            return Err(ReportError::InvalidRange { start, end });
        }
        Ok(DateRange {
            start,
            end,
            label: label.into(),
            holiday: false,
        })
    }

    /// Marks the range as landing on a holiday.
    pub fn with_holiday(mut self, holiday: bool) -> Self {
        self.holiday = holiday;
        self
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days in the range, weekends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True for single-day (daily) periods.
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Iterates every calendar date in the range in chronological order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.num_days() as usize)
    }
}
