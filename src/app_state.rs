//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::readiness::ReadinessReport;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Outcome of the startup readiness check.
    pub readiness: Arc<ReadinessReport>,
}

impl AppState {
    /// Wraps the report recorded by the startup gate.
    #[must_use]
    pub fn new(readiness: ReadinessReport) -> Self {
        Self {
            readiness: Arc::new(readiness),
        }
    }
}
