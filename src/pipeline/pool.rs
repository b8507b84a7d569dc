//! Bounded worker pool for aggregation sub-jobs.
//!
//! The AGGREGATING state fans independent, read-only computations out over a
//! fixed number of scoped worker threads and joins all results before
//! anything moves downstream. Sub-jobs share only the borrowed record slice;
//! results are collected over a channel and merged by the single
//! orchestrating thread, so there is no locking on the data itself. One
//! failing sub-job flips an abort flag: jobs not yet started are skipped,
//! in-flight jobs run to completion, and the first error in job order is
//! reported.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use tracing::debug;

use crate::aggregation::{bucket_under_threshold, day_breakdown, scan_absences};
use crate::config::HolidayCalendar;
use crate::error::ReportResult;
use crate::models::{
    AttendanceRecord, DateRange, DayRow, EmployeeId, ThresholdBucket, WorkDuration,
};

/// Identity of one aggregation sub-job.
///
/// The derived ordering is the deterministic join order: the absence scan,
/// then thresholds ascending by value, then the overall breakdown, then
/// sub-units ascending by identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SubJobId {
    /// Absence scan plus the duplicate-key integrity check.
    Absence,
    /// Under-hours bucket for one threshold.
    Threshold(WorkDuration),
    /// Per-day breakdown over the whole organization.
    Breakdown,
    /// Per-day breakdown restricted to one sub-unit.
    SubUnit(String),
}

/// The output of one completed sub-job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubJobOutput {
    /// Absent employees in first-occurrence order.
    Absent(Vec<EmployeeId>),
    /// One filled threshold bucket.
    Bucket(ThresholdBucket),
    /// Chronological day rows for the whole organization.
    Breakdown(Vec<DayRow>),
    /// Chronological day rows for one sub-unit.
    SubUnitRows(Vec<DayRow>),
}

/// One schedulable unit of aggregation work over borrowed input.
#[derive(Debug, Clone)]
pub struct SubJob<'a> {
    pub(crate) id: SubJobId,
    pub(crate) records: &'a [AttendanceRecord],
    pub(crate) period: &'a DateRange,
    pub(crate) calendar: &'a HolidayCalendar,
}

impl SubJob<'_> {
    fn execute(&self) -> ReportResult<SubJobOutput> {
        match &self.id {
            SubJobId::Absence => {
                let scan = scan_absences(self.records, self.calendar)?;
                Ok(SubJobOutput::Absent(scan.absent))
            }
            SubJobId::Threshold(threshold) => Ok(SubJobOutput::Bucket(bucket_under_threshold(
                self.records,
                *threshold,
                self.calendar,
            ))),
            SubJobId::Breakdown => Ok(SubJobOutput::Breakdown(day_breakdown(
                self.records,
                self.period,
                self.calendar,
                None,
            ))),
            SubJobId::SubUnit(unit) => Ok(SubJobOutput::SubUnitRows(day_breakdown(
                self.records,
                self.period,
                self.calendar,
                Some(unit),
            ))),
        }
    }
}

/// Runs sub-jobs on at most `width` worker threads and joins the results.
///
/// Workers pull job indices from a shared cursor until the queue is drained
/// or the abort flag is set. Results come back keyed by [`SubJobId`], so the
/// caller merges them in a stable order regardless of completion order.
pub(crate) fn run_sub_jobs(
    jobs: &[SubJob<'_>],
    width: usize,
) -> ReportResult<BTreeMap<SubJobId, SubJobOutput>> {
    if jobs.is_empty() {
        return Ok(BTreeMap::new());
    }

    let width = width.clamp(1, jobs.len());
    let cursor = AtomicUsize::new(0);
    let abort = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        let cursor = &cursor;
        let abort = &abort;
        for _ in 0..width {
            let tx = tx.clone();
            scope.spawn(move || {
                loop {
                    if abort.load(Ordering::SeqCst) {
                        break;
                    }
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(job) = jobs.get(index) else {
                        break;
                    };
                    debug!(job = ?job.id, "running aggregation sub-job");
                    let outcome = job.execute();
                    if outcome.is_err() {
                        abort.store(true, Ordering::SeqCst);
                    }
                    // The receiver outlives the scope; send cannot fail here.
                    let _ = tx.send((index, job.id.clone(), outcome));
                }
            });
        }
    });
    drop(tx);

    let mut completed: Vec<_> = rx.into_iter().collect();
    completed.sort_by_key(|(index, _, _)| *index);

    let mut joined = BTreeMap::new();
    for (_, id, outcome) in completed {
        joined.insert(id, outcome?);
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn record(id: &str, day: u32, present: bool) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: EmployeeId::new(id),
            date: date(day),
            present,
            worked_duration: present.then(|| WorkDuration::from_hours_minutes(7, 0)),
            sub_unit: None,
        }
    }

    fn jobs_for<'a>(
        records: &'a [AttendanceRecord],
        period: &'a DateRange,
        calendar: &'a HolidayCalendar,
    ) -> Vec<SubJob<'a>> {
        vec![
            SubJob {
                id: SubJobId::Absence,
                records,
                period,
                calendar,
            },
            SubJob {
                id: SubJobId::Threshold(WorkDuration::from_hours_minutes(8, 0)),
                records,
                period,
                calendar,
            },
            SubJob {
                id: SubJobId::Breakdown,
                records,
                period,
                calendar,
            },
        ]
    }

    #[test]
    fn test_join_order_is_deterministic() {
        assert!(SubJobId::Absence < SubJobId::Threshold(WorkDuration::from_minutes(1)));
        assert!(
            SubJobId::Threshold(WorkDuration::from_hours_minutes(8, 0))
                < SubJobId::Threshold(WorkDuration::from_hours_minutes(8, 30))
        );
        assert!(SubJobId::Threshold(WorkDuration::from_minutes(10_000)) < SubJobId::Breakdown);
        assert!(SubJobId::Breakdown < SubJobId::SubUnit("finance".to_string()));
        assert!(
            SubJobId::SubUnit("finance".to_string()) < SubJobId::SubUnit("logistics".to_string())
        );
    }

    #[test]
    fn test_pool_matches_sequential_results() {
        let records = vec![
            record("E001", 7, false),
            record("E002", 7, true),
            record("E001", 8, true),
            record("E002", 8, false),
        ];
        let period = DateRange::new(date(7), date(8), "weekly-partial").unwrap();
        let calendar = HolidayCalendar::default();
        let jobs = jobs_for(&records, &period, &calendar);

        let parallel = run_sub_jobs(&jobs, 4).unwrap();
        let sequential = run_sub_jobs(&jobs, 1).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), 3);
        assert!(matches!(
            parallel.get(&SubJobId::Absence),
            Some(SubJobOutput::Absent(absent)) if absent.len() == 2
        ));
    }

    #[test]
    fn test_width_larger_than_job_count_is_fine() {
        let records = vec![record("E001", 7, true)];
        let period = DateRange::new(date(7), date(7), "daily-2025-07-07").unwrap();
        let calendar = HolidayCalendar::default();
        let jobs = jobs_for(&records, &period, &calendar);
        let joined = run_sub_jobs(&jobs, 64).unwrap();
        assert_eq!(joined.len(), 3);
    }

    #[test]
    fn test_failing_job_aborts_the_join() {
        // Duplicate employee/date pair makes the absence scan fail.
        let records = vec![record("E001", 7, true), record("E001", 7, true)];
        let period = DateRange::new(date(7), date(7), "daily-2025-07-07").unwrap();
        let calendar = HolidayCalendar::default();
        let jobs = jobs_for(&records, &period, &calendar);
        let err = run_sub_jobs(&jobs, 2).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ReportError::DuplicateRecord { .. }
        ));
    }

    #[test]
    fn test_empty_job_list_yields_empty_join() {
        assert!(run_sub_jobs(&[], 4).unwrap().is_empty());
    }
}
