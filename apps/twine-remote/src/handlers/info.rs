//! Info endpoint and the catch-all for unrouted requests

use axum::{
    body::Body,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{
    dto::ingestion::{ErrorResponse, InfoResponse},
    response::TextJson,
};

/// Fixed info message, served for GET on any path
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Remote control is up (any path answers the same)", body = InfoResponse, content_type = "text/json")
    ),
    tag = "info"
)]
pub async fn info_handler() -> TextJson<InfoResponse> {
    TextJson(InfoResponse::default())
}

/// Requests no route matched
///
/// GET gets the info message, HEAD its headers, POST outside `/ingest` a 404,
/// anything else a 501.
pub async fn fallback_handler(method: Method, uri: Uri) -> Response {
    match method {
        Method::GET => info_handler().await.into_response(),
        Method::HEAD => {
            let (parts, _) = info_handler().await.into_response().into_parts();
            Response::from_parts(parts, Body::empty())
        }
        Method::POST => {
            debug!(path = %uri.path(), "Received a POST");
            warn!(path = %uri.path(), "No handler for POST, nothing ingested");
            (
                StatusCode::NOT_FOUND,
                TextJson(ErrorResponse::message(format!(
                    "no handler for POST {}",
                    uri.path()
                ))),
            )
                .into_response()
        }
        other => unsupported_method_handler(other).await,
    }
}

/// Methods the remote control has no handler for
pub async fn unsupported_method_handler(method: Method) -> Response {
    warn!(method = %method, "Unsupported method");
    (
        StatusCode::NOT_IMPLEMENTED,
        TextJson(ErrorResponse::message(format!(
            "unsupported method {}",
            method
        ))),
    )
        .into_response()
}
