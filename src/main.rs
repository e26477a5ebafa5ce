//! db-readiness server entry point.
//!
//! Verifies the database once, then starts the Axum HTTP server. Any
//! readiness failure ends the process with exit status `1`.

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use db_readiness::api;
use db_readiness::app_state::AppState;
use db_readiness::config::AppConfig;
use db_readiness::persistence::DatabaseSource;
use db_readiness::readiness::gate::DEFAULT_EXIT_GRACE;
use db_readiness::readiness::{ReadinessVerifier, StartupGate};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting db-readiness");

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let gate = StartupGate::new(
        ReadinessVerifier::with_validation_timeout(config.validation_timeout()),
        DEFAULT_EXIT_GRACE,
    );

    let source = match DatabaseSource::from_config(&config) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!(error = %err, "invalid database configuration");
            return Ok(gate.abort(&err).await);
        }
    };

    let report = match gate.check(&source, &cancel).await {
        Ok(report) => report,
        Err(err) => {
            source.close().await;
            return Ok(gate.abort(&err).await);
        }
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(report));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    source.close().await;
    tracing::info!("shutdown complete");

    Ok(ExitCode::SUCCESS)
}

/// Trips `cancel` on Ctrl-C or SIGTERM.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
    cancel.cancel();
}
