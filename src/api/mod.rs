//! HTTP layer served once the startup gate has passed.

pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// Path the OpenAPI document is served from.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI document for every served endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "db-readiness"),
    paths(handlers::system::health_handler, handlers::system::ready_handler),
    tags((name = "System", description = "Liveness and startup readiness"))
)]
pub struct ApiDoc;

/// Builds the complete router.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(handlers::routes()).merge(docs_routes())
}

#[cfg(feature = "swagger-ui")]
fn docs_routes() -> Router<AppState> {
    use utoipa_swagger_ui::SwaggerUi;

    Router::new().merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
