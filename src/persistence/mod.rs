//! Persistence layer: PostgreSQL connection sources.
//!
//! Adapts `sqlx` to the [`crate::readiness::ConnectionSource`] seam. The
//! pooled `sqlx::PgPool` is what production startup verifies; the direct
//! source exists so a misconfigured deployment fails with a configuration
//! error instead of silently running without a pool.

pub mod postgres;

pub use postgres::{DatabaseConnection, DatabaseSource, DirectSource, build_pool};
