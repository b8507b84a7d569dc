//! Error types for the attendance report engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all failure classes the pipeline can hit: period resolution, source
//! data, rendering, delivery, and configuration.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the attendance report engine.
///
/// All operations in the engine return this error type. Variants map onto the
/// pipeline's failure taxonomy: resolution failures are expected outcomes the
/// orchestrator turns into a skipped run, data and rendering failures are
/// fatal and never retried, and delivery failures distinguish permanent
/// authentication problems from exhausted transient retries.
///
/// # Example
///
/// ```
/// use report_engine::error::ReportError;
///
/// let error = ReportError::ConfigNotFound {
///     path: "/missing/report.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/report.yaml");
/// ```
#[derive(Debug, Error)]
pub enum ReportError {
    /// The default daily target fell on a non-working day with no override.
    #[error("No reportable date: {date} is not a working day")]
    NoReportableDate {
        /// The non-working date that was rejected.
        date: NaiveDate,
    },

    /// The metric source could not produce attendance data for the period.
    #[error("Attendance data unavailable for period '{period}'")]
    DataUnavailable {
        /// The label of the period that had no data.
        period: String,
    },

    /// The metric source itself failed (connectivity, not "no rows").
    #[error("Metric source unavailable: {message}")]
    SourceUnavailable {
        /// A description of the connectivity failure.
        message: String,
    },

    /// The same employee/date pair appeared more than once in the input.
    #[error("Duplicate attendance record for employee '{employee_id}' on {date}")]
    DuplicateRecord {
        /// The employee whose record was duplicated.
        employee_id: String,
        /// The date of the duplicated record.
        date: NaiveDate,
    },

    /// The total employee count was zero, so no percentage can be computed.
    #[error("Cannot compute absence percentage over an empty population")]
    EmptyPopulation,

    /// A date range was constructed with its end before its start.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange {
        /// The range start date.
        start: NaiveDate,
        /// The range end date.
        end: NaiveDate,
    },

    /// A renderer failed to produce its artifact.
    #[error("Rendering failed for format '{format}': {message}")]
    Rendering {
        /// The artifact format that failed to render.
        format: String,
        /// A description of the rendering failure.
        message: String,
    },

    /// The delivery gate rejected the credentials. Never retried.
    #[error("Delivery authentication failed: {message}")]
    DeliveryAuthentication {
        /// The gate's rejection message.
        message: String,
    },

    /// All delivery attempts failed with transient errors.
    #[error("Delivery exhausted after {attempts} attempts: {last_error}")]
    DeliveryExhausted {
        /// How many attempts were made before giving up.
        attempts: u32,
        /// The error from the final attempt.
        last_error: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but contained an unusable value.
    #[error("Invalid configuration field '{field}': {message}")]
    ConfigInvalid {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return ReportError.
pub type ReportResult<T> = Result<T, ReportError>;
