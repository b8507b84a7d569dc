//! External collaborator contracts.
//!
//! The pipeline core never talks to a database, an HTML templater, or an
//! SMTP server directly. It drives three seams: the metric source that
//! produces attendance rows, renderers that turn a frozen dataset into
//! artifacts, and the delivery gate that transports the final envelope.
//! Process bootstrap constructs the implementations (with whatever
//! connection handles they need) and injects them into the orchestrator.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delivery::{DeliveryEnvelope, DeliveryError};
use crate::error::ReportResult;
use crate::models::{AttendanceRecord, DateRange, ReportDataset};

/// The artifact formats the orchestrator can ask a renderer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// HTML email body.
    Html,
    /// CSV attachment (daily reports).
    Csv,
    /// Spreadsheet attachment with one worksheet per sub-unit
    /// (weekly and coarser reports).
    Spreadsheet,
}

impl ArtifactFormat {
    /// Lowercase name used in error messages and artifact paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::Html => "html",
            ArtifactFormat::Csv => "csv",
            ArtifactFormat::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque reference to a rendered artifact: a path, buffer key, or blob
/// handle. The core never inspects the bytes behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(pub String);

impl ArtifactRef {
    /// Creates a reference from anything string-like.
    pub fn new(reference: impl Into<String>) -> Self {
        ArtifactRef(reference.into())
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies raw attendance rows for a resolved period.
///
/// `fetch` returns `Ok(None)` or an empty vector to signal "no data" — that
/// is a valid answer, never an error. Errors are reserved for connectivity
/// failures ([`crate::error::ReportError::SourceUnavailable`]).
pub trait MetricSource {
    /// Fetches all attendance rows inside the range, one call per run.
    fn fetch(&self, range: &DateRange) -> ReportResult<Option<Vec<AttendanceRecord>>>;

    /// Total number of employees in the organization.
    fn total_employee_count(&self) -> ReportResult<usize>;
}

/// Renders a frozen dataset into one artifact.
///
/// Renderers consume only the dataset and its period label; they must not
/// re-query data. Artifact names must derive from the period label so a
/// re-run for the same period overwrites instead of accumulating.
pub trait Renderer {
    /// Produces the artifact for one format.
    fn render(&self, dataset: &ReportDataset, format: ArtifactFormat) -> ReportResult<ArtifactRef>;
}

/// Transports a delivery envelope.
///
/// The gate classifies its own failures: [`DeliveryError::Authentication`]
/// is permanent and never retried, [`DeliveryError::Transient`] is retried
/// up to the configured cap. The `timeout` bounds one transport attempt; the
/// gate's transport layer enforces it.
pub trait DeliveryGate {
    /// Performs one delivery attempt.
    fn deliver(&self, envelope: &DeliveryEnvelope, timeout: Duration) -> Result<(), DeliveryError>;
}
