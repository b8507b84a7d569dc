//! Report pipeline orchestration.
//!
//! One run moves through a fixed state machine:
//!
//! ```text
//! RESOLVING -> FETCHING -> AGGREGATING -> RENDERING -> DELIVERING -> DONE
//! ```
//!
//! with a terminal `FAILED` reachable from any state and a terminal
//! `SKIPPED` reachable from RESOLVING (weekend/holiday short-circuit) or
//! FETCHING (empty dataset). The orchestrator owns exactly one
//! [`ReportDataset`] per run, fans aggregation sub-jobs out over a bounded
//! worker pool, and wraps the delivery call in the bounded-retry envelope.
//! It produces no user-facing output itself: outcomes and causes go back to
//! the caller as typed values.

mod collaborators;
mod pool;

pub use collaborators::{ArtifactFormat, ArtifactRef, DeliveryGate, MetricSource, Renderer};
pub use pool::{SubJob, SubJobId, SubJobOutput};

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::aggregation::{assemble, sub_units};
use crate::config::{HolidayCalendar, ReportConfig};
use crate::delivery::{DeliveryEnvelope, deliver_with_retry};
use crate::error::ReportError;
use crate::models::{AttendanceRecord, DateRange, ReportDataset, ReportKind};
use crate::resolver::PeriodResolver;

/// The pipeline step a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStep {
    /// Period resolution.
    Resolving,
    /// Metric source fetch.
    Fetching,
    /// Parallel aggregation and join.
    Aggregating,
    /// Artifact rendering.
    Rendering,
    /// Delivery under the retry envelope.
    Delivering,
}

impl RunStep {
    /// Lowercase step name for messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStep::Resolving => "resolving",
            RunStep::Fetching => "fetching",
            RunStep::Aggregating => "aggregating",
            RunStep::Rendering => "rendering",
            RunStep::Delivering => "delivering",
        }
    }
}

impl fmt::Display for RunStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed run: which step, which period, and the underlying cause.
///
/// Every `FAILED` transition carries this context so the caller can log and
/// alert without re-deriving anything. Before resolution succeeds the period
/// is the report kind's name.
#[derive(Debug, Error)]
#[error("report run failed at {step} for period '{period}': {source}")]
pub struct PipelineError {
    /// The state the run failed in.
    pub step: RunStep,
    /// The period label, or the report kind when resolution never finished.
    pub period: String,
    /// The underlying failure.
    #[source]
    pub source: ReportError,
}

/// Why a run ended `SKIPPED` instead of producing a report.
///
/// Skips are expected outcomes, not failures; nothing was fetched, rendered,
/// or delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A defaulted daily run landed on a Saturday or Sunday.
    NonWorkingDay(NaiveDate),
    /// The resolved single-day period is a declared holiday.
    Holiday(NaiveDate),
    /// The source answered with zero rows for the period.
    EmptyDataset,
}

/// Proof of a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Attempts the gate needed, including the successful one.
    pub attempts_made: u32,
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The resolved period.
    pub period: DateRange,
    /// The frozen dataset.
    pub dataset: ReportDataset,
    /// Rendered artifacts, body first.
    pub artifacts: Vec<ArtifactRef>,
    /// Delivery proof; `None` when the run was asked not to deliver.
    pub delivery: Option<DeliveryReceipt>,
}

/// Terminal outcome of one run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The run short-circuited with nothing to report.
    Skipped(SkipReason),
    /// The run went all the way through.
    Completed(RunSummary),
}

/// Per-run knobs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Explicit target date overriding "today" for period resolution.
    pub target: Option<NaiveDate>,
    /// Produce a report even when the period lands on a declared holiday.
    pub holiday_override: bool,
    /// Deliver the rendered report. Re-running a finished period with this
    /// off recomputes and re-renders (artifact names derive from the period
    /// label, so files overwrite) without touching the gate; re-delivery is
    /// always the caller's explicit choice.
    pub deliver: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            target: None,
            holiday_override: false,
            deliver: true,
        }
    }
}

/// Drives one report run end to end.
///
/// Generic over the three injected collaborators; the process bootstrap owns
/// their lifecycles (connection handles included) and hands them in at
/// construction time.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use report_engine::config::ConfigLoader;
/// use report_engine::models::ReportKind;
/// use report_engine::pipeline::{Orchestrator, RunOptions};
/// # use report_engine::pipeline::{ArtifactFormat, ArtifactRef, DeliveryGate, MetricSource, Renderer};
/// # use report_engine::delivery::{DeliveryEnvelope, DeliveryError};
/// # use report_engine::error::ReportResult;
/// # use report_engine::models::{AttendanceRecord, DateRange, ReportDataset};
/// # struct Db; struct Html; struct Smtp;
/// # impl MetricSource for Db {
/// #     fn fetch(&self, _: &DateRange) -> ReportResult<Option<Vec<AttendanceRecord>>> { Ok(None) }
/// #     fn total_employee_count(&self) -> ReportResult<usize> { Ok(0) }
/// # }
/// # impl Renderer for Html {
/// #     fn render(&self, _: &ReportDataset, _: ArtifactFormat) -> ReportResult<ArtifactRef> {
/// #         Ok(ArtifactRef::new(""))
/// #     }
/// # }
/// # impl DeliveryGate for Smtp {
/// #     fn deliver(&self, _: &DeliveryEnvelope, _: std::time::Duration) -> Result<(), DeliveryError> { Ok(()) }
/// # }
///
/// let loader = ConfigLoader::load("./config/attendance")?;
/// let orchestrator = Orchestrator::new(
///     loader.config().clone(),
///     loader.calendar().clone(),
///     Db,
///     Html,
///     Smtp,
/// );
/// let today = NaiveDate::from_ymd_opt(2025, 7, 16).unwrap();
/// let outcome = orchestrator.run(ReportKind::Weekly, today, RunOptions::default());
/// # Ok::<(), report_engine::error::ReportError>(())
/// ```
#[derive(Debug)]
pub struct Orchestrator<S, R, G> {
    source: S,
    renderer: R,
    gate: G,
    resolver: PeriodResolver,
    config: ReportConfig,
}

impl<S: MetricSource, R: Renderer, G: DeliveryGate> Orchestrator<S, R, G> {
    /// Wires the orchestrator with its configuration and collaborators.
    pub fn new(
        config: ReportConfig,
        calendar: HolidayCalendar,
        source: S,
        renderer: R,
        gate: G,
    ) -> Self {
        Orchestrator {
            source,
            renderer,
            gate,
            resolver: PeriodResolver::new(calendar),
            config,
        }
    }

    /// Runs one report for the given kind and clock.
    ///
    /// Re-running for the same period is safe: aggregation is deterministic
    /// over identical source rows, artifacts overwrite, and delivery only
    /// happens when `options.deliver` is set.
    pub fn run(
        &self,
        kind: ReportKind,
        today: NaiveDate,
        options: RunOptions,
    ) -> Result<RunOutcome, PipelineError> {
        // RESOLVING
        debug!(kind = kind.as_str(), "resolving reporting period");
        let period = match self.resolver.resolve(kind, options.target, today) {
            Ok(period) => period,
            Err(ReportError::NoReportableDate { date }) => {
                info!(%date, "nothing to report on a non-working day");
                return Ok(RunOutcome::Skipped(SkipReason::NonWorkingDay(date)));
            }
            Err(source) => return Err(fail(RunStep::Resolving, kind.as_str(), source)),
        };
        if period.holiday && !options.holiday_override {
            info!(date = %period.start, "period is a holiday, no report will be sent");
            return Ok(RunOutcome::Skipped(SkipReason::Holiday(period.start)));
        }

        // FETCHING
        debug!(period = %period.label, "fetching attendance rows");
        let fetched = self
            .source
            .fetch(&period)
            .map_err(|e| fail(RunStep::Fetching, &period.label, e))?;
        let records = match fetched {
            None => {
                return Err(fail(
                    RunStep::Fetching,
                    &period.label,
                    ReportError::DataUnavailable {
                        period: period.label.clone(),
                    },
                ));
            }
            Some(records) if records.is_empty() => {
                info!(period = %period.label, "source returned no rows, skipping");
                return Ok(RunOutcome::Skipped(SkipReason::EmptyDataset));
            }
            Some(records) => records,
        };
        let total_employees = self
            .source
            .total_employee_count()
            .map_err(|e| fail(RunStep::Fetching, &period.label, e))?;

        // AGGREGATING
        debug!(
            period = %period.label,
            rows = records.len(),
            width = self.config.worker_width,
            "aggregating on worker pool"
        );
        let dataset = self
            .aggregate_parallel(&records, total_employees, &period)
            .map_err(|e| fail(RunStep::Aggregating, &period.label, e))?;

        // RENDERING
        debug!(period = %period.label, "rendering artifacts");
        let body = self
            .renderer
            .render(&dataset, ArtifactFormat::Html)
            .map_err(|e| fail(RunStep::Rendering, &period.label, e))?;
        let attachment_format = if period.is_single_day() {
            ArtifactFormat::Csv
        } else {
            ArtifactFormat::Spreadsheet
        };
        let attachment = self
            .renderer
            .render(&dataset, attachment_format)
            .map_err(|e| fail(RunStep::Rendering, &period.label, e))?;

        // DELIVERING
        let delivery = if options.deliver {
            let envelope = DeliveryEnvelope {
                addressees: self.config.receivers.clone(),
                subject: format!("{} - {}", self.config.subject_prefix, period.label),
                body: body.clone(),
                attachment: Some(attachment.clone()),
            };
            debug!(period = %period.label, "delivering report");
            let attempts_made = deliver_with_retry(&self.gate, &envelope, &self.config.retry)
                .map_err(|e| fail(RunStep::Delivering, &period.label, e))?;
            Some(DeliveryReceipt { attempts_made })
        } else {
            debug!(period = %period.label, "delivery not requested for this run");
            None
        };

        // DONE
        info!(period = %period.label, delivered = delivery.is_some(), "report run complete");
        Ok(RunOutcome::Completed(RunSummary {
            period,
            dataset,
            artifacts: vec![body, attachment],
            delivery,
        }))
    }

    /// Fans aggregation sub-jobs out over the worker pool and joins them
    /// into the frozen dataset.
    fn aggregate_parallel(
        &self,
        records: &[AttendanceRecord],
        total_employees: usize,
        period: &DateRange,
    ) -> Result<ReportDataset, ReportError> {
        let calendar = self.resolver.calendar();

        let mut jobs = vec![SubJob {
            id: SubJobId::Absence,
            records,
            period,
            calendar,
        }];
        for threshold in &self.config.thresholds {
            jobs.push(SubJob {
                id: SubJobId::Threshold(*threshold),
                records,
                period,
                calendar,
            });
        }
        if !period.is_single_day() {
            jobs.push(SubJob {
                id: SubJobId::Breakdown,
                records,
                period,
                calendar,
            });
            if self.config.group_by_sub_unit {
                for unit in sub_units(records) {
                    jobs.push(SubJob {
                        id: SubJobId::SubUnit(unit),
                        records,
                        period,
                        calendar,
                    });
                }
            }
        }

        let joined = pool::run_sub_jobs(&jobs, self.config.worker_width)?;

        let mut absent = Vec::new();
        let mut buckets = Vec::new();
        let mut breakdown = Vec::new();
        let mut sub_unit_breakdown = BTreeMap::new();
        for (id, output) in joined {
            match (id, output) {
                (SubJobId::Absence, SubJobOutput::Absent(list)) => absent = list,
                (SubJobId::Threshold(_), SubJobOutput::Bucket(bucket)) => buckets.push(bucket),
                (SubJobId::Breakdown, SubJobOutput::Breakdown(rows)) => breakdown = rows,
                (SubJobId::SubUnit(unit), SubJobOutput::SubUnitRows(rows)) => {
                    sub_unit_breakdown.insert(unit, rows);
                }
                // Job identities and output variants are paired in execute().
                _ => unreachable!("sub-job output does not match its identity"),
            }
        }

        assemble(
            period.clone(),
            total_employees,
            absent,
            buckets,
            breakdown,
            sub_unit_breakdown,
        )
    }
}

fn fail(step: RunStep, period: &str, source: ReportError) -> PipelineError {
    PipelineError {
        step,
        period: period.to_string(),
        source,
    }
}
