//! Twine Remote Control
//!
//! HTTP surface that stores a POSTed payload in a file and runs the Twine
//! ingester against it. GET on any path answers with a fixed info message.

pub mod config;
pub mod dto;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

use twine_remote_domain::IngestionService;
use twine_remote_process::{FilePayloadStore, ProcessIngestRunner};

/// Ingestion service wired to the local filesystem and subprocess adapters
pub type RemoteIngestionService = IngestionService<FilePayloadStore, ProcessIngestRunner>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: Arc<RemoteIngestionService>,
}

impl AppState {
    pub fn new(service: RemoteIngestionService) -> Self {
        Self {
            ingestion_service: Arc::new(service),
        }
    }
}
