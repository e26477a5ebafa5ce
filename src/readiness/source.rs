//! Connection-source abstraction consumed by the verifier.
//!
//! The verifier never talks to a driver directly. It only needs something
//! that can hand out a connection and a connection that can answer "are you
//! alive?". Release is tied to `Drop`: a connection goes back to its pool
//! when the value falls out of scope, on every exit path.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::ReadinessError;

/// How a [`ConnectionSource`] produces connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Hands out reusable, pre-established connections from a pool.
    Pooled,
    /// Opens a brand new connection for every acquisition.
    Direct,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pooled => f.write_str("pooled"),
            Self::Direct => f.write_str("direct"),
        }
    }
}

/// A single database session held for the duration of one attempt.
pub trait Connection: Send {
    /// Checks that the session is usable, waiting at most `timeout`.
    ///
    /// A zero `timeout` means no limit is applied.
    fn is_valid(&mut self, timeout: Duration) -> impl Future<Output = bool> + Send;
}

/// Provider of database connections.
///
/// Implementations are expected to be internally thread-safe; the verifier
/// keeps at most one acquisition outstanding at a time.
pub trait ConnectionSource: Send + Sync {
    /// Connection type handed out by [`ConnectionSource::acquire`].
    type Connection: Connection;

    /// Whether this source is pool-backed.
    fn kind(&self) -> SourceKind;

    /// Human-readable name used in logs and configuration errors.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Acquires one connection.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::Acquire`] when no connection can be
    /// obtained.
    fn acquire(
        &self,
    ) -> impl Future<Output = Result<Self::Connection, ReadinessError>> + Send;
}
