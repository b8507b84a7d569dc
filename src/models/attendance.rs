//! Attendance record model and related types.
//!
//! This module defines the raw attendance row the metric source returns for
//! each employee and date, plus the minute-granular [`WorkDuration`] used for
//! worked time and under-hours thresholds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An employee's badge identifier (matricule).
///
/// Newtype over the source system's string identifier so employee ids cannot
/// be confused with sub-unit names or free-form strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    /// Creates an employee id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        EmployeeId(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A worked duration with minute granularity.
///
/// Check-in/check-out differences and under-hours thresholds are both whole
/// minutes in the source data, so durations are stored as minutes rather than
/// floating-point hours. This keeps threshold comparisons exact and datasets
/// bit-identical across re-runs.
///
/// # Example
///
/// ```
/// use report_engine::models::WorkDuration;
///
/// let worked = WorkDuration::from_hours_minutes(7, 50);
/// let threshold = WorkDuration::from_minutes(8 * 60);
/// assert!(worked < threshold);
/// assert_eq!(worked.to_string(), "7h 50m");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct WorkDuration {
    minutes: u32,
}

impl WorkDuration {
    /// Creates a duration from a total number of minutes.
    pub fn from_minutes(minutes: u32) -> Self {
        WorkDuration { minutes }
    }

    /// Creates a duration from whole hours and leftover minutes.
    pub fn from_hours_minutes(hours: u32, minutes: u32) -> Self {
        WorkDuration {
            minutes: hours * 60 + minutes,
        }
    }

    /// Returns the total number of minutes.
    pub fn num_minutes(&self) -> u32 {
        self.minutes
    }

    /// Returns the whole-hours component.
    pub fn hours_part(&self) -> u32 {
        self.minutes / 60
    }

    /// Returns the leftover-minutes component.
    pub fn minutes_part(&self) -> u32 {
        self.minutes % 60
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours_part(), self.minutes_part())
    }
}

/// One attendance row: one employee on one date.
///
/// Produced by the external metric source and treated as immutable once
/// fetched. `worked_duration` is `None` when the employee was absent (there
/// is no check-in/check-out pair to subtract). `sub_unit` carries the
/// employee's organizational unit (service) when the source provides it, used
/// for per-unit breakdowns in period-level reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee this row belongs to.
    pub employee_id: EmployeeId,
    /// The calendar date of the attendance row.
    pub date: chrono::NaiveDate,
    /// Whether the employee was present on this date.
    pub present: bool,
    /// Worked time for the day; `None` when absent.
    pub worked_duration: Option<WorkDuration>,
    /// The employee's organizational sub-unit, when known.
    #[serde(default)]
    pub sub_unit: Option<String>,
}
