//! Core data models for the attendance report engine.
//!
//! This module contains all the domain models used throughout the pipeline.

mod attendance;
mod dataset;
mod period;

pub use attendance::{AttendanceRecord, EmployeeId, WorkDuration};
pub use dataset::{DayRow, ReportDataset, ThresholdBucket};
pub use period::{DateRange, ReportKind};
