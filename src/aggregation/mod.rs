//! Aggregation engine.
//!
//! Pure computation turning raw attendance rows into an immutable
//! [`ReportDataset`]: the absence list, under-hours threshold buckets, the
//! overall absence percentage, and per-day (and per-sub-unit) breakdowns for
//! multi-day periods. Everything here is deterministic: the same input rows
//! always produce an identical dataset, ordering included, which is what
//! makes pipeline re-runs idempotent.

mod absence;
mod breakdown;
mod percentage;
mod under_threshold;

pub use absence::{AbsenceScan, scan_absences};
pub use breakdown::{day_breakdown, sub_units};
pub use percentage::absence_percentage;
pub use under_threshold::bucket_under_threshold;

use std::collections::BTreeMap;

use crate::config::HolidayCalendar;
use crate::error::ReportResult;
use crate::models::{
    AttendanceRecord, DateRange, DayRow, EmployeeId, ReportDataset, ThresholdBucket, WorkDuration,
};

/// Joins sub-results into the final frozen dataset.
///
/// This is the single merge point: the sequential [`aggregate`] entry and the
/// orchestrator's parallel fan-out both end up here, so their outputs cannot
/// diverge. Computes the overall percentage, which fails for an empty
/// population.
pub fn assemble(
    period: DateRange,
    total_employee_count: usize,
    absent: Vec<EmployeeId>,
    buckets: Vec<ThresholdBucket>,
    breakdown: Vec<DayRow>,
    sub_unit_breakdown: BTreeMap<String, Vec<DayRow>>,
) -> ReportResult<ReportDataset> {
    let absence_percentage = absence_percentage(absent.len(), total_employee_count)?;

    let under_threshold = buckets
        .into_iter()
        .map(|bucket| (bucket.threshold, bucket))
        .collect();

    Ok(ReportDataset {
        period,
        total_employee_count,
        absent,
        under_threshold,
        breakdown,
        sub_unit_breakdown,
        absence_percentage,
    })
}

/// Aggregates attendance rows for one period into a [`ReportDataset`].
///
/// The sequential reference path: scans absences (with the duplicate-key
/// check), buckets every configured threshold, and builds per-day breakdowns
/// for multi-day periods, grouped per sub-unit when requested. Weekend rows
/// are excluded throughout: they never produce absences, bucket members, or
/// non-zero breakdown rows. The orchestrator computes the same sub-results
/// on its worker pool and joins them through [`assemble`].
///
/// # Errors
///
/// * [`crate::error::ReportError::DuplicateRecord`] for a repeated
///   employee/date pair.
/// * [`crate::error::ReportError::EmptyPopulation`] when `total_employees`
///   is zero.
pub fn aggregate(
    records: &[AttendanceRecord],
    thresholds: &[WorkDuration],
    total_employees: usize,
    period: &DateRange,
    calendar: &HolidayCalendar,
    group_by_sub_unit: bool,
) -> ReportResult<ReportDataset> {
    let scan = scan_absences(records, calendar)?;

    let buckets = thresholds
        .iter()
        .map(|threshold| bucket_under_threshold(records, *threshold, calendar))
        .collect();

    let day_rows = if period.is_single_day() {
        Vec::new()
    } else {
        day_breakdown(records, period, calendar, None)
    };

    let per_unit = if group_by_sub_unit && !period.is_single_day() {
        sub_units(records)
            .into_iter()
            .map(|unit| {
                let rows = day_breakdown(records, period, calendar, Some(&unit));
                (unit, rows)
            })
            .collect()
    } else {
        BTreeMap::new()
    };

    assemble(
        period.clone(),
        total_employees,
        scan.absent,
        buckets,
        day_rows,
        per_unit,
    )
}
