//! Application lifecycle gate: the fail-fast policy around the verifier.
//!
//! [`StartupGate::check`] is called exactly once, after the data layer is
//! built and before the server binds. It never exits the process itself;
//! the binary turns an `Err` into an exit status via [`StartupGate::abort`].

use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::outcome::{ReadinessReport, VerificationOutcome};
use super::source::{ConnectionSource, SourceKind};
use super::verifier::ReadinessVerifier;
use crate::error::ReadinessError;

/// Pause before exiting so buffered log lines reach the collector.
pub const DEFAULT_EXIT_GRACE: Duration = Duration::from_secs(1);

/// Binary readiness gate: either the database is proven reachable or
/// startup stops.
#[derive(Debug, Clone, Copy)]
pub struct StartupGate {
    verifier: ReadinessVerifier,
    exit_grace: Duration,
}

impl StartupGate {
    /// Creates a gate around `verifier`.
    #[must_use]
    pub const fn new(verifier: ReadinessVerifier, exit_grace: Duration) -> Self {
        Self {
            verifier,
            exit_grace,
        }
    }

    /// Checks that `source` is pool-backed, then verifies it.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::NotPooled`] without touching the source if
    /// it is not pool-backed, or the verifier's terminal error
    /// ([`ReadinessError::Exhausted`], [`ReadinessError::Cancelled`]).
    pub async fn check<S: ConnectionSource>(
        &self,
        source: &S,
        cancel: &CancellationToken,
    ) -> Result<ReadinessReport, ReadinessError> {
        let name = source.describe();
        let kind = source.kind();
        if kind != SourceKind::Pooled {
            tracing::error!(source = %name, %kind, "connection source is not pool-backed");
            return Err(ReadinessError::NotPooled(format!("{name} ({kind})")));
        }

        match self.verifier.verify(source, cancel).await {
            VerificationOutcome::Success { attempts, elapsed } => {
                tracing::info!(
                    source = %name,
                    attempts,
                    elapsed_ms = duration_ms(elapsed),
                    "successfully established database connection"
                );
                Ok(ReadinessReport {
                    status: "ready".to_string(),
                    source: name,
                    attempts,
                    max_attempts: self.verifier.max_attempts(),
                    validation_timeout_secs: self.verifier.validation_timeout().as_secs(),
                    elapsed_ms: duration_ms(elapsed),
                    verified_at: Utc::now(),
                })
            }
            VerificationOutcome::Failure(err) => {
                tracing::error!(
                    source = %name,
                    error = %err,
                    "failed to establish database connection after retries"
                );
                Err(err)
            }
        }
    }

    /// Fail-fast exit path: returns the status the process must exit with.
    ///
    /// Configuration errors exit immediately. Exhaustion and cancellation
    /// first wait out the grace period so buffered log lines are flushed.
    /// The cause is expected to be logged already.
    pub async fn abort(&self, err: &ReadinessError) -> ExitCode {
        if !err.is_configuration() {
            tokio::time::sleep(self.exit_grace).await;
        }
        tracing::info!("exiting application due to failures");
        ExitCode::from(err.exit_code())
    }
}

impl Default for StartupGate {
    fn default() -> Self {
        Self::new(ReadinessVerifier::default(), DEFAULT_EXIT_GRACE)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
