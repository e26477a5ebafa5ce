//! Readiness error types.
//!
//! [`ReadinessError`] is the central error type for the startup gate. The
//! variants fall into four classes:
//!
//! | Class          | Variants                              | Handling                    |
//! |----------------|---------------------------------------|-----------------------------|
//! | Configuration  | `NotPooled`, `InvalidConfig`          | fatal, no attempt is made   |
//! | Transient      | `Acquire`, `ValidationFailed`         | retried with backoff        |
//! | Exhaustion     | `Exhausted`                           | fatal                       |
//! | Cancellation   | `Cancelled`                           | fatal, shutdown in progress |

/// Errors raised while proving the database is reachable at startup.
#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    /// The connection source hands out fresh, unpooled connections.
    #[error("connection source is not pool-backed: {0}")]
    NotPooled(String),

    /// Verifier parameters or database settings are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A connection could not be acquired from the source.
    #[error("failed to acquire connection: {0}")]
    Acquire(String),

    /// A connection was acquired but did not pass validation.
    #[error("database connection validation failed")]
    ValidationFailed,

    /// Every attempt failed; carries the last transient failure.
    #[error("database not ready after {attempts} attempt(s): {last}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Failure observed on the final attempt.
        #[source]
        last: Box<ReadinessError>,
    },

    /// The backoff wait was interrupted by a shutdown signal.
    #[error("interrupted during backoff after attempt {attempt}")]
    Cancelled {
        /// Attempts completed before the interruption.
        attempt: u32,
    },
}

impl ReadinessError {
    /// Returns `true` for failures the verifier retries locally.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Acquire(_) | Self::ValidationFailed)
    }

    /// Returns `true` for configuration problems detected before any
    /// connection attempt.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::NotPooled(_) | Self::InvalidConfig(_))
    }

    /// Process exit status reported to the supervisor for this error.
    ///
    /// Readiness is binary, so every fatal condition maps to `1`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        1
    }
}

impl From<sqlx::Error> for ReadinessError {
    fn from(err: sqlx::Error) -> Self {
        Self::Acquire(err.to_string())
    }
}
