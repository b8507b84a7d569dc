//! Under-hours threshold buckets.
//!
//! For each configured threshold, collects the employees whose worked time
//! on a present working day fell strictly below it.

use crate::config::HolidayCalendar;
use crate::models::{AttendanceRecord, ThresholdBucket, WorkDuration};

/// Collects the `(employee, worked time)` pairs under one threshold.
///
/// Membership is `present && worked_duration < threshold`, evaluated per
/// record; absent rows carry no duration and never qualify, and weekend rows
/// are skipped outright. Thresholds are independent of each other, so for
/// `t1 < t2` the `t1` bucket is always a subset of the `t2` bucket. Member
/// order is the input row order.
pub fn bucket_under_threshold(
    records: &[AttendanceRecord],
    threshold: WorkDuration,
    calendar: &HolidayCalendar,
) -> ThresholdBucket {
    let mut bucket = ThresholdBucket::new(threshold);

    for record in records {
        if !record.present || calendar.is_weekend(record.date) {
            continue;
        }
        match record.worked_duration {
            Some(worked) if worked < threshold => {
                bucket.members.push((record.employee_id.clone(), worked));
            }
            _ => {}
        }
    }

    bucket
}
