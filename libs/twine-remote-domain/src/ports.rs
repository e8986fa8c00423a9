//! Ports (trait definitions) for external dependencies
//!
//! The domain states what it needs from the outside world: somewhere to put a
//! payload file, and something that runs the ingest command against it. Adapter
//! crates provide the implementations.
//!
//! ## Static Dispatch
//!
//! Native async traits with `impl Future` return types, so each adapter is
//! monomorphized into the service without trait objects.

use std::future::Future;
use std::path::Path;

use bytes::Bytes;

use crate::ingestion::{
    command::{Invocation, RunOutput},
    entity::Payload,
    error::IngestionError,
};

/// Port for payload file storage
pub trait PayloadStore: Send + Sync {
    /// Handle on a written payload file
    ///
    /// Dropping the handle deletes the file. An ingest abandoned half way, for
    /// instance because the client disconnected, therefore leaves nothing behind.
    type Stored: AsRef<Path> + Send + Sync;

    /// Write a payload's bytes to a file of its own
    ///
    /// The handle's path is what the ingest command should read. Every call
    /// must use a distinct path so concurrent requests never share a file.
    ///
    /// # Errors
    ///
    /// Returns `IngestionError::StorageFailure` if the file cannot be written
    fn save(
        &self,
        payload: &Payload,
        data: Bytes,
    ) -> impl Future<Output = Result<Self::Stored, IngestionError>> + Send;

    /// Remove a payload file once the ingest is over, reporting failures
    ///
    /// Removing a file that no longer exists succeeds.
    fn remove(&self, stored: Self::Stored) -> impl Future<Output = Result<(), IngestionError>> + Send;
}

/// Port for running the external ingest command
pub trait IngestRunner: Send + Sync {
    /// Run an invocation to completion and capture its merged output
    ///
    /// A non-zero exit is not an error at this level; it is reported through
    /// [`RunOutput::status`] and judged by the service.
    ///
    /// # Errors
    ///
    /// - `IngestionError::SpawnFailure` if the program cannot be started
    /// - `IngestionError::Timeout` if the program exceeds the runner's bound
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<RunOutput, IngestionError>> + Send;
}
