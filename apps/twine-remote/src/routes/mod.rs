//! API routes

pub mod ingestion;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    dto::ingestion::{ErrorResponse, InfoResponse, IngestResponse},
    handlers, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::ingestion::ingest_handler,
        handlers::info::info_handler
    ),
    components(
        schemas(InfoResponse, IngestResponse, ErrorResponse)
    ),
    tags(
        (name = "ingestion", description = "Twine ingest trigger"),
        (name = "info", description = "Info message served on every GET")
    ),
    info(
        title = "Twine Remote Control API",
        version = "0.1.0",
        description = "Stores a POSTed payload and runs the Twine ingester against it"
    )
)]
pub struct ApiDoc;

/// Create the main application router
///
/// Request bodies are capped at the service's maximum payload size.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.ingestion_service.config().max_payload_size;

    Router::new()
        .merge(ingestion::routes())
        .fallback(handlers::info::fallback_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
