//! # Twine Remote Process Adapters
//!
//! Implementations of the domain ports backed by the local machine:
//!
//! - [`FilePayloadStore`](infrastructure::FilePayloadStore) writes each payload
//!   to its own file in a directory
//! - [`ProcessIngestRunner`](infrastructure::ProcessIngestRunner) runs the
//!   ingest command as a subprocess, without a shell

pub mod infrastructure;

pub use infrastructure::{FilePayloadStore, ProcessIngestRunner};
