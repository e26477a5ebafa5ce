//! # db-readiness
//!
//! Fail-fast PostgreSQL readiness gate for service startup.
//!
//! Before the service binds its listener it must prove it can obtain and
//! validate a live database connection. The check runs once, blocks
//! startup, retries a bounded number of times with linear backoff, and on
//! failure stops the process with exit status `1` so the supervisor can
//! restart or alert. There is no degraded "no database" mode.
//!
//! ## Architecture
//!
//! ```text
//! main
//!     │
//!     ├── AppConfig (config/)
//!     ├── PgPool, lazily connected (persistence/)
//!     │
//!     ├── StartupGate (readiness/)
//!     │     └── ReadinessVerifier ── BackoffPolicy
//!     │
//!     └── Axum router: /health, /ready (api/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod persistence;
pub mod readiness;
