//! Startup readiness: prove the database is reachable before serving.
//!
//! The pieces, leaves first:
//!
//! - [`ConnectionSource`] / [`Connection`]: what the verifier talks to.
//! - [`BackoffPolicy`]: delay between attempts, a pure function of the
//!   attempt number.
//! - [`ReadinessVerifier`]: the bounded retry loop.
//! - [`StartupGate`]: rejects unpooled sources, runs the verifier once, and
//!   owns the fail-fast exit path.

pub mod backoff;
pub mod gate;
pub mod outcome;
pub mod source;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use backoff::BackoffPolicy;
pub use gate::StartupGate;
pub use outcome::{ReadinessReport, VerificationOutcome};
pub use source::{Connection, ConnectionSource, SourceKind};
pub use verifier::ReadinessVerifier;
