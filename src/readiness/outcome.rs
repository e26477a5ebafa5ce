//! Verification results.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ReadinessError;

/// Result of one [`super::ReadinessVerifier::verify`] call.
#[derive(Debug)]
#[must_use]
pub enum VerificationOutcome {
    /// A connection was acquired and validated.
    Success {
        /// Attempt on which validation succeeded (1-based).
        attempts: u32,
        /// Wall time spent verifying, backoff waits included.
        elapsed: Duration,
    },
    /// Attempts were exhausted or the wait was interrupted.
    Failure(ReadinessError),
}

impl VerificationOutcome {
    /// Returns `true` if the database was proven reachable.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the terminal error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ReadinessError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(err) => Some(err),
        }
    }
}

/// Snapshot of a successful startup check, exposed on `GET /ready`.
///
/// Recorded once at startup and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReadinessReport {
    /// Always `"ready"`; the process does not run otherwise.
    pub status: String,
    /// Name of the connection source that was verified.
    pub source: String,
    /// Attempt on which validation succeeded.
    pub attempts: u32,
    /// Attempt budget the verifier was configured with.
    pub max_attempts: u32,
    /// Per-attempt validation timeout in seconds.
    pub validation_timeout_secs: u64,
    /// Time spent verifying, in milliseconds.
    pub elapsed_ms: u64,
    /// When verification completed.
    pub verified_at: DateTime<Utc>,
}
