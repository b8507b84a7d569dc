//! Aggregated report dataset models.
//!
//! This module defines the immutable result of one aggregation run:
//! threshold buckets, per-day breakdown rows, and the joined
//! [`ReportDataset`] handed to renderers.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::attendance::{EmployeeId, WorkDuration};
use super::period::DateRange;

/// Employees whose worked time fell under one configured threshold.
///
/// Members keep the insertion order of their first occurrence in the source
/// rows, so rendering is deterministic. Thresholds are evaluated
/// independently: an employee under 8h is also under 8h30.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBucket {
    /// The configured under-hours threshold.
    pub threshold: WorkDuration,
    /// `(employee, worked time)` pairs in first-occurrence order.
    pub members: Vec<(EmployeeId, WorkDuration)>,
}

impl ThresholdBucket {
    /// Creates an empty bucket for a threshold.
    pub fn new(threshold: WorkDuration) -> Self {
        ThresholdBucket {
            threshold,
            members: Vec::new(),
        }
    }

    /// True when an employee appears in this bucket.
    pub fn contains(&self, employee_id: &EmployeeId) -> bool {
        self.members.iter().any(|(id, _)| id == employee_id)
    }
}

/// One date of a multi-day period breakdown.
///
/// Holiday rows carry `holiday: true` and zeroed counts: a holiday is not an
/// absence, whatever the underlying attendance rows say for that date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRow {
    /// The calendar date this row covers.
    pub date: NaiveDate,
    /// The weekday of `date`.
    pub weekday: Weekday,
    /// Whether the date is a configured holiday.
    pub holiday: bool,
    /// Number of absent employees on this date (zero on holidays).
    pub absence_count: u32,
    /// Number of employees with an attendance row on this date.
    pub headcount: u32,
    /// `absence_count / headcount * 100`, rounded to two decimals
    /// (zero on holidays and on dates with no rows).
    pub absence_percentage: Decimal,
}

/// The immutable join of all sub-results for one reporting period.
///
/// Built exactly once per run by the aggregation engine, then frozen: the
/// orchestrator hands it to renderers by shared reference and nothing
/// downstream mutates it. Re-aggregating the same source rows produces an
/// identical dataset, membership ordering included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDataset {
    /// The period this dataset covers.
    pub period: DateRange,
    /// Total number of employees in the organization.
    pub total_employee_count: usize,
    /// Absent employees in first-occurrence order, no duplicates.
    pub absent: Vec<EmployeeId>,
    /// Under-hours buckets keyed by threshold, ascending.
    pub under_threshold: BTreeMap<WorkDuration, ThresholdBucket>,
    /// One row per date of the period, chronological; empty for daily runs.
    pub breakdown: Vec<DayRow>,
    /// Per-sub-unit breakdowns keyed by unit name; empty unless grouping
    /// was requested.
    pub sub_unit_breakdown: BTreeMap<String, Vec<DayRow>>,
    /// `|absent| / total_employee_count * 100`, rounded to two decimals.
    pub absence_percentage: Decimal,
}

impl ReportDataset {
    /// Number of absent employees over the period.
    pub fn absent_count(&self) -> usize {
        self.absent.len()
    }

    /// The bucket for a configured threshold, if one was computed.
    pub fn bucket(&self, threshold: WorkDuration) -> Option<&ThresholdBucket> {
        self.under_threshold.get(&threshold)
    }
}
