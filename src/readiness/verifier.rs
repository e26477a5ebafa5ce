//! Bounded-retry connection verification.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::backoff::BackoffPolicy;
use super::outcome::VerificationOutcome;
use super::source::{Connection, ConnectionSource};
use crate::error::ReadinessError;

/// Number of attempts made before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Per-attempt validation timeout used when none is configured.
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Proves that a [`ConnectionSource`] can hand out a live connection.
///
/// Makes up to `max_attempts` attempts. Each attempt acquires one
/// connection, validates it, and drops it before anything else happens, so
/// at most one connection is ever held. Acquisition and validation failures
/// share the same retry counter. Between attempts the verifier waits
/// [`BackoffPolicy::delay`]; that wait is the only suspension point and
/// gives up as soon as the cancellation token fires.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessVerifier {
    validation_timeout: Duration,
    max_attempts: u32,
    backoff: BackoffPolicy,
}

impl ReadinessVerifier {
    /// Creates a verifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::InvalidConfig`] if `max_attempts` is zero.
    pub fn new(
        validation_timeout: Duration,
        max_attempts: u32,
        backoff: BackoffPolicy,
    ) -> Result<Self, ReadinessError> {
        if max_attempts == 0 {
            return Err(ReadinessError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            validation_timeout,
            max_attempts,
            backoff,
        })
    }

    /// Verifier with the fixed attempt budget and linear 2 s backoff.
    #[must_use]
    pub fn with_validation_timeout(validation_timeout: Duration) -> Self {
        Self {
            validation_timeout,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: BackoffPolicy::default(),
        }
    }

    /// Per-attempt validation timeout.
    #[must_use]
    pub const fn validation_timeout(&self) -> Duration {
        self.validation_timeout
    }

    /// Attempt budget.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay schedule between attempts.
    #[must_use]
    pub const fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Runs the verification loop against `source`.
    ///
    /// Returns [`VerificationOutcome::Success`] on the first attempt whose
    /// connection validates. Returns [`VerificationOutcome::Failure`] with
    /// [`ReadinessError::Exhausted`] once the budget is spent, or with
    /// [`ReadinessError::Cancelled`] if `cancel` fires during a backoff
    /// wait. Never terminates the process.
    pub async fn verify<S: ConnectionSource>(
        &self,
        source: &S,
        cancel: &CancellationToken,
    ) -> VerificationOutcome {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            let failure = match self.attempt(source).await {
                Ok(()) => {
                    return VerificationOutcome::Success {
                        attempts: attempt + 1,
                        elapsed: started.elapsed(),
                    };
                }
                Err(err) => err,
            };

            attempt += 1;
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                error = %failure,
                "failed to get a valid database connection"
            );

            if attempt >= self.max_attempts {
                return VerificationOutcome::Failure(ReadinessError::Exhausted {
                    attempts: attempt,
                    last: Box::new(failure),
                });
            }

            let delay = self.backoff.delay(attempt);
            tracing::debug!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "backing off"
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::warn!(attempt, "backoff interrupted by shutdown");
                    return VerificationOutcome::Failure(ReadinessError::Cancelled { attempt });
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// One acquire-and-validate round. The connection is dropped, and so
    /// returned to its source, before this returns.
    async fn attempt<S: ConnectionSource>(&self, source: &S) -> Result<(), ReadinessError> {
        let mut conn = source.acquire().await?;
        if conn.is_valid(self.validation_timeout).await {
            Ok(())
        } else {
            Err(ReadinessError::ValidationFailed)
        }
    }
}

impl Default for ReadinessVerifier {
    fn default() -> Self {
        Self::with_validation_timeout(DEFAULT_VALIDATION_TIMEOUT)
    }
}
