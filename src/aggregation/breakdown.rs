//! Per-day period breakdowns.
//!
//! Multi-day periods (weekly and coarser) get one row per calendar date with
//! that day's absence count and percentage. Holiday and weekend rows are
//! forced to zero: a non-working day is not an absence, whatever attendance
//! rows exist for the date.

use std::collections::BTreeSet;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::config::HolidayCalendar;
use crate::models::{AttendanceRecord, DateRange, DayRow};

use super::percentage::absence_percentage;

/// Builds one [`DayRow`] per date of the period, in chronological order.
///
/// `unit` restricts the rows to one organizational sub-unit when set.
/// Headcount is the number of attendance rows for the date; dates with no
/// rows (and all holiday and weekend dates) report zero counts and a zero
/// percentage rather than dividing by nothing.
pub fn day_breakdown(
    records: &[AttendanceRecord],
    period: &DateRange,
    calendar: &HolidayCalendar,
    unit: Option<&str>,
) -> Vec<DayRow> {
    period
        .dates()
        .map(|date| {
            let holiday = calendar.is_holiday(date);
            if holiday || calendar.is_weekend(date) {
                return DayRow {
                    date,
                    weekday: date.weekday(),
                    holiday,
                    absence_count: 0,
                    headcount: 0,
                    absence_percentage: Decimal::ZERO,
                };
            }

            let day_records = records.iter().filter(|r| {
                r.date == date
                    && unit.is_none_or(|u| r.sub_unit.as_deref() == Some(u))
            });
            let mut headcount = 0u32;
            let mut absence_count = 0u32;
            for record in day_records {
                headcount += 1;
                if !record.present {
                    absence_count += 1;
                }
            }

            let percentage = if headcount > 0 {
                // headcount > 0, so this cannot fail
                absence_percentage(absence_count as usize, headcount as usize)
                    .unwrap_or(Decimal::ZERO)
            } else {
                Decimal::ZERO
            };

            DayRow {
                date,
                weekday: date.weekday(),
                holiday: false,
                absence_count,
                headcount,
                absence_percentage: percentage,
            }
        })
        .collect()
}

/// Distinct sub-unit names present in the records, sorted.
pub fn sub_units(records: &[AttendanceRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|r| r.sub_unit.clone())
        .collect()
}
