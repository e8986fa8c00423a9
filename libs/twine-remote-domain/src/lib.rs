//! # Twine Remote Domain Layer
//!
//! Business logic of the Twine remote control: a payload arrives, is persisted
//! to a file, and an external ingest command is run against that file.
//!
//! - **Entities**: [`Payload`] and its [`PayloadId`]
//! - **Commands**: [`IngestCommand`] and the [`Invocation`] bound to one payload
//! - **Ports**: [`PayloadStore`] and [`IngestRunner`], implemented by adapters
//! - **Services**: [`IngestionService`] orchestrating store and runner
//!
//! This crate performs no I/O itself. Filesystem and subprocess handling live in
//! adapter crates implementing the ports.
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use twine_remote_domain::ports::{IngestRunner, PayloadStore};
//! use twine_remote_domain::IngestionService;
//!
//! async fn example<S: PayloadStore, R: IngestRunner>(service: IngestionService<S, R>) {
//!     match service.ingest(Bytes::from_static(b"<a> <b> <c> <g> .\n")).await {
//!         Ok(report) => println!("ran {}", report.command),
//!         Err(err) => eprintln!("Error: {}", err),
//!     }
//! }
//! ```

pub mod ingestion;
pub mod ports;

// Re-export commonly used types
pub use ingestion::{
    ExitState, IngestCommand, IngestReport, IngestionConfig, IngestionError, IngestionService,
    Invocation, Payload, PayloadId, RunOutput,
};
pub use ports::{IngestRunner, PayloadStore};
