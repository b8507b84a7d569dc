//! Period resolution.
//!
//! This module converts a report kind plus an optional explicit target date
//! into the concrete [`DateRange`] a run covers. Calendar rules live here:
//! the most recently completed Monday-Friday span for weekly runs, calendar
//! month/quarter/year boundaries, and the weekend/holiday rules for defaulted
//! daily runs. Weekends and holidays are *not* excluded from the resolved
//! range itself; business-calendar exclusion belongs to the aggregation
//! engine.

use chrono::{Datelike, Months, NaiveDate};

use crate::config::HolidayCalendar;
use crate::error::{ReportError, ReportResult};
use crate::models::{DateRange, ReportKind};

/// Resolves report kinds into concrete date ranges.
///
/// The resolver owns the holiday calendar; "today" is always passed in
/// explicitly so runs are reproducible and tests can pin the clock.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use report_engine::config::HolidayCalendar;
/// use report_engine::models::ReportKind;
/// use report_engine::resolver::PeriodResolver;
///
/// let resolver = PeriodResolver::new(HolidayCalendar::default());
/// let today = NaiveDate::from_ymd_opt(2025, 7, 16).unwrap(); // Wednesday
/// let range = resolver.resolve(ReportKind::Weekly, None, today).unwrap();
/// assert_eq!(range.label, "weekly-2025-07-07_2025-07-11");
/// ```
#[derive(Debug, Clone)]
pub struct PeriodResolver {
    calendar: HolidayCalendar,
}

impl PeriodResolver {
    /// Creates a resolver over the given holiday calendar.
    pub fn new(calendar: HolidayCalendar) -> Self {
        PeriodResolver { calendar }
    }

    /// The calendar this resolver consults.
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// Resolves a report kind into a concrete date range.
    ///
    /// * `Daily` uses the explicit target when given, otherwise today.
    ///   A defaulted daily run on a Saturday or Sunday fails with
    ///   [`ReportError::NoReportableDate`]; the caller treats that as a
    ///   skipped run, not a failure. A daily range landing on a declared
    ///   holiday is still returned, flagged `holiday: true`, so the
    ///   orchestrator can short-circuit delivery.
    /// * `Weekly` resolves to the most recently completed Monday-Friday span
    ///   strictly before today's week; the explicit target, when given,
    ///   replaces today as the anchor.
    /// * `Monthly`/`Quarterly`/`Yearly` resolve to the full calendar unit
    ///   containing the target (or today).
    pub fn resolve(
        &self,
        kind: ReportKind,
        target: Option<NaiveDate>,
        today: NaiveDate,
    ) -> ReportResult<DateRange> {
        match kind {
            ReportKind::Daily => self.resolve_daily(target, today),
            ReportKind::Weekly => Self::resolve_weekly(target.unwrap_or(today)),
            ReportKind::Monthly => Self::resolve_monthly(target.unwrap_or(today)),
            ReportKind::Quarterly => Self::resolve_quarterly(target.unwrap_or(today)),
            ReportKind::Yearly => Self::resolve_yearly(target.unwrap_or(today)),
        }
    }

    fn resolve_daily(&self, target: Option<NaiveDate>, today: NaiveDate) -> ReportResult<DateRange> {
        let date = match target {
            Some(date) => date,
            None => {
                if self.calendar.is_weekend(today) {
                    return Err(ReportError::NoReportableDate { date: today });
                }
                today
            }
        };

        let range = DateRange::new(date, date, format!("daily-{date}"))?;
        Ok(range.with_holiday(self.calendar.is_holiday(date)))
    }

    fn resolve_weekly(anchor: NaiveDate) -> ReportResult<DateRange> {
        let this_monday = anchor - chrono::Days::new(u64::from(anchor.weekday().num_days_from_monday()));
        let last_monday = this_monday - chrono::Days::new(7);
        let last_friday = last_monday + chrono::Days::new(4);
        DateRange::new(
            last_monday,
            last_friday,
            format!("weekly-{last_monday}_{last_friday}"),
        )
    }

    fn resolve_monthly(anchor: NaiveDate) -> ReportResult<DateRange> {
        let start = first_of_month(anchor.year(), anchor.month());
        let end = end_of_month(anchor.year(), anchor.month());
        DateRange::new(start, end, format!("monthly-{:04}-{:02}", anchor.year(), anchor.month()))
    }

    fn resolve_quarterly(anchor: NaiveDate) -> ReportResult<DateRange> {
        let quarter = (anchor.month() - 1) / 3;
        let start_month = quarter * 3 + 1;
        let start = first_of_month(anchor.year(), start_month);
        let end = end_of_month(anchor.year(), start_month + 2);
        DateRange::new(
            start,
            end,
            format!("quarterly-{:04}-q{}", anchor.year(), quarter + 1),
        )
    }

    fn resolve_yearly(anchor: NaiveDate) -> ReportResult<DateRange> {
        let start = first_of_month(anchor.year(), 1);
        let end = end_of_month(anchor.year(), 12);
        DateRange::new(start, end, format!("yearly-{:04}", anchor.year()))
    }
}

/// First day of a month. `month` is always in `1..=12` here.
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month is in 1..=12")
}

/// Last day of a month, leap years included.
fn end_of_month(year: i32, month: u32) -> NaiveDate {
    first_of_month(year, month) + Months::new(1) - chrono::Days::new(1)
}
