//! Ingestion domain module
//!
//! Entities, commands and the service that turns a received payload into one
//! run of the external ingest command.

pub mod command;
pub mod entity;
pub mod error;
pub mod ids;
pub mod service;

pub use command::{ExitState, IngestCommand, Invocation, RunOutput};
pub use entity::Payload;
pub use error::{IngestionError, Result};
pub use ids::PayloadId;
pub use service::{IngestReport, IngestionConfig, IngestionService};
