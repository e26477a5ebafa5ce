//! PostgreSQL connection sources backed by `sqlx`.

use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::{Connection as SqlxConnection, Pool, Postgres};

use crate::config::AppConfig;
use crate::error::ReadinessError;
use crate::readiness::{Connection, ConnectionSource, SourceKind};

/// Builds the application pool without opening any connection.
///
/// The pool connects lazily so that proving connectivity is left to the
/// startup gate rather than to pool construction.
///
/// # Errors
///
/// Returns [`ReadinessError::InvalidConfig`] if the database URL is
/// malformed.
pub fn build_pool(config: &AppConfig) -> Result<PgPool, ReadinessError> {
    let options = config.connect_options()?;
    Ok(PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(config.connect_timeout())
        .connect_lazy_with(options))
}

impl ConnectionSource for PgPool {
    type Connection = PoolConnection<Postgres>;

    fn kind(&self) -> SourceKind {
        SourceKind::Pooled
    }

    fn describe(&self) -> String {
        "postgres (pooled)".to_string()
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, ReadinessError> {
        Ok(Pool::acquire(self).await?)
    }
}

impl Connection for PoolConnection<Postgres> {
    async fn is_valid(&mut self, timeout: Duration) -> bool {
        ping_within(&mut **self, timeout).await
    }
}

/// Opens a fresh, unpooled [`PgConnection`] on every acquisition.
///
/// Selected with `DATABASE_POOL_ENABLED=false`. The startup gate rejects it.
#[derive(Debug, Clone)]
pub struct DirectSource {
    options: PgConnectOptions,
}

impl DirectSource {
    /// Creates a direct source for the given connect options.
    #[must_use]
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }
}

impl ConnectionSource for DirectSource {
    type Connection = PgConnection;

    fn kind(&self) -> SourceKind {
        SourceKind::Direct
    }

    fn describe(&self) -> String {
        "postgres (direct)".to_string()
    }

    async fn acquire(&self) -> Result<PgConnection, ReadinessError> {
        Ok(<PgConnection as SqlxConnection>::connect_with(&self.options).await?)
    }
}

impl Connection for PgConnection {
    async fn is_valid(&mut self, timeout: Duration) -> bool {
        ping_within(self, timeout).await
    }
}

/// The connection source selected by configuration.
#[derive(Debug, Clone)]
pub enum DatabaseSource {
    /// `sqlx` pool; the only kind the startup gate accepts.
    Pooled(PgPool),
    /// One new connection per acquisition.
    Direct(DirectSource),
}

impl DatabaseSource {
    /// Picks the source according to `DATABASE_POOL_ENABLED`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::InvalidConfig`] if the database URL is
    /// malformed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReadinessError> {
        if config.database_pool_enabled {
            Ok(Self::Pooled(build_pool(config)?))
        } else {
            Ok(Self::Direct(DirectSource::new(config.connect_options()?)))
        }
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        if let Self::Pooled(pool) = self {
            pool.close().await;
        }
    }
}

/// Connection handed out by [`DatabaseSource`].
#[derive(Debug)]
pub enum DatabaseConnection {
    /// Checked out of the pool; returned to it on drop.
    Pooled(PoolConnection<Postgres>),
    /// Standalone connection; closed on drop.
    Direct(PgConnection),
}

impl ConnectionSource for DatabaseSource {
    type Connection = DatabaseConnection;

    fn kind(&self) -> SourceKind {
        match self {
            Self::Pooled(pool) => pool.kind(),
            Self::Direct(direct) => direct.kind(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Pooled(pool) => pool.describe(),
            Self::Direct(direct) => direct.describe(),
        }
    }

    async fn acquire(&self) -> Result<DatabaseConnection, ReadinessError> {
        match self {
            Self::Pooled(pool) => ConnectionSource::acquire(pool)
                .await
                .map(DatabaseConnection::Pooled),
            Self::Direct(direct) => direct.acquire().await.map(DatabaseConnection::Direct),
        }
    }
}

impl Connection for DatabaseConnection {
    async fn is_valid(&mut self, timeout: Duration) -> bool {
        match self {
            Self::Pooled(conn) => conn.is_valid(timeout).await,
            Self::Direct(conn) => conn.is_valid(timeout).await,
        }
    }
}

/// Round-trips a ping, bounded by `timeout` unless it is zero.
async fn ping_within(conn: &mut PgConnection, timeout: Duration) -> bool {
    let result = if timeout.is_zero() {
        conn.ping().await
    } else {
        match tokio::time::timeout(timeout, conn.ping()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(timeout_secs = timeout.as_secs(), "connection ping timed out");
                return false;
            }
        }
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "connection ping failed");
            false
        }
    }
}
