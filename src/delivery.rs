//! Delivery envelope and bounded-retry policy.
//!
//! The orchestrator builds one [`DeliveryEnvelope`] per run after rendering
//! and pushes it through the delivery gate under a small retry state machine:
//! authentication failures are permanent and abort immediately, transient
//! transport failures are retried up to the configured cap, then reported as
//! exhausted with the last cause attached.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::RetryPolicy;
use crate::error::{ReportError, ReportResult};
use crate::pipeline::{ArtifactRef, DeliveryGate};

/// The rendered report plus its addressees, ready for transport.
///
/// Owned solely by the delivery call: built once after rendering, discarded
/// once the gate succeeds or retries are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEnvelope {
    /// Receiver addresses.
    pub addressees: Vec<String>,
    /// Subject line, e.g. `Attendance report - weekly-2025-07-07_2025-07-11`.
    pub subject: String,
    /// The rendered body artifact (HTML).
    pub body: ArtifactRef,
    /// Optional attachment artifact (CSV or spreadsheet).
    pub attachment: Option<ArtifactRef>,
}

/// A classified failure from one delivery attempt.
///
/// The gate implementation does the classification; the retry loop only
/// branches on the variant.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// Credentials were rejected. Permanent; retrying cannot help.
    #[error("authentication rejected: {0}")]
    Authentication(String),
    /// Anything else: connection resets, timeouts, greylisting. Retriable.
    #[error("transient transport failure: {0}")]
    Transient(String),
}

/// Mutable retry state threaded through the delivery loop.
#[derive(Debug, Clone, Default)]
pub struct DeliveryAttempts {
    /// Attempts performed so far.
    pub attempts_made: u32,
    /// The most recent transient failure, if any.
    pub last_error: Option<String>,
}

/// Delivers an envelope under the bounded-retry policy.
///
/// Calls the gate up to `policy.max_attempts` times, passing the per-attempt
/// timeout through. There is no backoff beyond "wait for the attempt, then
/// try again". Returns the number of attempts made on success.
///
/// # Errors
///
/// * [`ReportError::DeliveryAuthentication`] on the first authentication
///   rejection; no further attempts are made.
/// * [`ReportError::DeliveryExhausted`] once the cap is reached, carrying
///   the final transient cause.
pub fn deliver_with_retry<G: DeliveryGate>(
    gate: &G,
    envelope: &DeliveryEnvelope,
    policy: &RetryPolicy,
) -> ReportResult<u32> {
    let mut attempts = DeliveryAttempts::default();

    while attempts.attempts_made < policy.max_attempts {
        attempts.attempts_made += 1;
        match gate.deliver(envelope, policy.attempt_timeout()) {
            Ok(()) => return Ok(attempts.attempts_made),
            Err(DeliveryError::Authentication(message)) => {
                return Err(ReportError::DeliveryAuthentication { message });
            }
            Err(DeliveryError::Transient(message)) => {
                warn!(
                    attempt = attempts.attempts_made,
                    max_attempts = policy.max_attempts,
                    error = %message,
                    "delivery attempt failed"
                );
                attempts.last_error = Some(message);
            }
        }
    }

    Err(ReportError::DeliveryExhausted {
        attempts: attempts.attempts_made,
        last_error: attempts
            .last_error
            .unwrap_or_else(|| "no attempt was made".to_string()),
    })
}
