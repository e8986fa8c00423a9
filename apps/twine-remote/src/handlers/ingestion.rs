//! Ingestion handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, error, info};
use twine_remote_domain::IngestionError;

use crate::{
    dto::ingestion::{ErrorResponse, IngestResponse, INGEST_COMPLETED},
    response::TextJson,
    AppState,
};

/// Store the body and run the ingester against it
#[utoipa::path(
    post,
    path = "/ingest",
    request_body(
        content = String,
        description = "Data to ingest, stored verbatim (typically N-Quads)",
        content_type = "application/n-quads"
    ),
    responses(
        (status = 200, description = "Ingest command exited with status zero", body = IngestResponse, content_type = "text/json"),
        (status = 413, description = "Payload too large", body = ErrorResponse, content_type = "text/json"),
        (status = 500, description = "Ingest command failed or could not be started", body = ErrorResponse, content_type = "text/json"),
        (status = 504, description = "Ingest command timed out and was killed", body = ErrorResponse, content_type = "text/json")
    ),
    tag = "ingestion"
)]
pub async fn ingest_handler(State(state): State<AppState>, body: Bytes) -> Response {
    debug!(path = "/ingest", "Received a POST");
    info!(data_size = body.len(), "Received ingest request");

    match state.ingestion_service.ingest(body).await {
        Ok(report) => {
            info!(
                payload_id = %report.payload_id,
                duration_ms = report.duration.as_millis() as u64,
                "Successfully ingested payload"
            );
            TextJson(IngestResponse {
                message: INGEST_COMPLETED.to_string(),
                logs: report.logs,
                command: report.command,
            })
            .into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to ingest payload");
            let status = match &err {
                IngestionError::CommandFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                IngestionError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                IngestionError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                IngestionError::SpawnFailure { .. }
                | IngestionError::StorageFailure(_)
                | IngestionError::ConfigError(_)
                | IngestionError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };

            let body = ErrorResponse {
                logs: err.logs().map(str::to_string),
                ..ErrorResponse::message(&err)
            };
            (status, TextJson(body)).into_response()
        }
    }
}
