//! DTOs for the remote control endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message served on every GET
pub const INFO_MESSAGE: &str = "Twine remote control";

/// Message of a successful ingest
pub const INGEST_COMPLETED: &str = "Ingest completed";

/// Response body for GET requests
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InfoResponse {
    #[schema(example = "Twine remote control")]
    pub message: String,
}

impl Default for InfoResponse {
    fn default() -> Self {
        Self {
            message: INFO_MESSAGE.to_string(),
        }
    }
}

/// Response body for a successful ingest
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    #[schema(example = "Ingest completed")]
    pub message: String,
    /// Merged standard output and standard error of the ingest command
    #[schema(example = "INFO Loaded 12 triples\n")]
    pub logs: String,
    /// Command line that was run
    #[schema(example = "twine -d -c /usr/etc/twine.conf /tmp/remote-data-0190a5c4-6c1e-7c3a-9f62-3d1f9b0e2a11.nq")]
    pub command: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Error: Command 'twine -d -c /usr/etc/twine.conf /tmp/remote-data.nq' returned non-zero exit status 1.")]
    pub message: String,
    /// Output captured from the ingest command, when it ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
}

impl ErrorResponse {
    /// Error body without command output
    pub fn message(description: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Error: {}", description),
            logs: None,
        }
    }
}
