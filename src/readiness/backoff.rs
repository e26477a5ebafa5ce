//! Delay schedule between verification attempts.

use std::time::Duration;

/// Default backoff unit: the wait grows by this much per failed attempt.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Linear backoff: the delay after failed attempt `n` is `n * base`.
///
/// The expected failure mode is a database that is still starting up, so
/// the schedule grows gently instead of exponentially. Stateless and
/// deterministic; the same attempt number always yields the same delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: Duration,
}

impl BackoffPolicy {
    /// Creates a linear policy with the given per-attempt unit.
    #[must_use]
    pub const fn linear(base: Duration) -> Self {
        Self { base }
    }

    /// Returns the per-attempt unit.
    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    /// Delay to wait after `attempt` failed attempts (1-based).
    ///
    /// Saturates at [`Duration::MAX`] rather than overflowing.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(attempt)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::linear(DEFAULT_BACKOFF_BASE)
    }
}
