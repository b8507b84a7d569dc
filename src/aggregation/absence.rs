//! Absence scan.
//!
//! Collects the absent-employee list from raw attendance rows and performs
//! the duplicate-key integrity check while it is at it.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::config::HolidayCalendar;
use crate::error::{ReportError, ReportResult};
use crate::models::{AttendanceRecord, EmployeeId};

/// The result of scanning attendance rows for absences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceScan {
    /// Absent employees in first-occurrence order, one entry per employee.
    pub absent: Vec<EmployeeId>,
}

/// Scans attendance rows for absent employees.
///
/// An employee absent on several dates of the period is listed once, at the
/// position of their first absent row, so rendering order is deterministic.
/// Weekend rows never count as absences: an employee whose only absent rows
/// fall on Saturdays or Sundays is not listed. A repeated `(employee, date)`
/// pair is a data-integrity problem in the source and is surfaced as
/// [`ReportError::DuplicateRecord`] with the offending key, never silently
/// deduplicated; the check covers weekend rows too.
pub fn scan_absences(
    records: &[AttendanceRecord],
    calendar: &HolidayCalendar,
) -> ReportResult<AbsenceScan> {
    let mut seen_keys: HashSet<(&EmployeeId, NaiveDate)> = HashSet::with_capacity(records.len());
    let mut seen_absent: HashSet<&EmployeeId> = HashSet::new();
    let mut absent = Vec::new();

    for record in records {
        if !seen_keys.insert((&record.employee_id, record.date)) {
            return Err(ReportError::DuplicateRecord {
                employee_id: record.employee_id.to_string(),
                date: record.date,
            });
        }
        if calendar.is_weekend(record.date) {
            continue;
        }
        if !record.present && seen_absent.insert(&record.employee_id) {
            absent.push(record.employee_id.clone());
        }
    }

    Ok(AbsenceScan { absent })
}
