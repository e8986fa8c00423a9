//! Ingestion routes

use axum::{routing::post, Router};

use crate::{
    handlers::{
        info::{info_handler, unsupported_method_handler},
        ingestion::ingest_handler,
    },
    AppState,
};

/// Create ingestion routes
///
/// GET on `/ingest` is the info message like on every other path.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/ingest",
        post(ingest_handler)
            .get(info_handler)
            .fallback(unsupported_method_handler),
    )
}
