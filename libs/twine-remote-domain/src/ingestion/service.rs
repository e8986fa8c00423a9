//! Ingestion service - Business logic orchestration
//!
//! The service takes a request body, hands it to the payload store, runs the
//! ingest command against the stored file and always cleans the file up.

use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info, warn};

use super::{IngestCommand, IngestionError, Payload, PayloadId};
use crate::ports::{IngestRunner, PayloadStore};

/// Configuration for the ingestion service
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Command run against each payload
    pub command: IngestCommand,
    /// Maximum accepted payload size in bytes (default: 100MB)
    pub max_payload_size: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            command: IngestCommand::default(),
            max_payload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Outcome of an ingest whose command exited with status zero
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub payload_id: PayloadId,
    /// Display form of the invocation that ran
    pub command: String,
    pub logs: String,
    pub duration: Duration,
}

/// Service turning received payloads into ingest runs
///
/// Generic over both ports, so the HTTP layer gets a fully monomorphized
/// service and tests can plug in in-memory doubles.
pub struct IngestionService<S, R> {
    store: S,
    runner: R,
    config: IngestionConfig,
}

impl<S, R> IngestionService<S, R>
where
    S: PayloadStore,
    R: IngestRunner,
{
    pub fn new(store: S, runner: R, config: IngestionConfig) -> Self {
        Self {
            store,
            runner,
            config,
        }
    }

    /// Create a service running the default `twine` command
    pub fn with_adapters(store: S, runner: R) -> Self {
        Self::new(store, runner, IngestionConfig::default())
    }

    /// Persist a payload and run the ingest command against it
    ///
    /// 1. Enforces the maximum payload size (empty payloads are accepted)
    /// 2. Writes the payload to a file of its own
    /// 3. Runs the command with that file as the last argument
    /// 4. Removes the file, whatever the outcome
    ///
    /// The stored handle is held across the run, so dropping this future
    /// before it completes still deletes the file.
    ///
    /// # Errors
    ///
    /// - `IngestionError::PayloadTooLarge` if data exceeds the configured bound
    /// - `IngestionError::StorageFailure` if the payload cannot be written
    /// - `IngestionError::CommandFailed` if the command exits non-zero
    /// - any error the runner reports (spawn failure, timeout)
    pub async fn ingest(&self, data: Bytes) -> Result<IngestReport, IngestionError> {
        if data.len() > self.config.max_payload_size {
            return Err(IngestionError::payload_too_large(
                data.len(),
                self.config.max_payload_size,
            ));
        }

        let mut payload = Payload::new(&data);
        let stored = self.store.save(&payload, data).await?;
        let location = stored.as_ref().to_path_buf();
        debug!(
            payload_id = %payload.id(),
            location = %location.display(),
            data_size = payload.size(),
            received_at = %payload.received_at(),
            "Payload persisted"
        );
        payload.set_location(location.clone());

        let invocation = self.config.command.bind(location.clone());
        let command = invocation.to_string();

        let started = Instant::now();
        let outcome = self.runner.run(&invocation).await;
        let duration = started.elapsed();

        if let Err(err) = self.store.remove(stored).await {
            warn!(
                payload_id = %payload.id(),
                location = %location.display(),
                error = %err,
                "Failed to remove payload file"
            );
        }

        let output = outcome?;
        if !output.status.success() {
            return Err(IngestionError::CommandFailed {
                command,
                status: output.status,
                logs: output.logs,
            });
        }

        info!(
            payload_id = %payload.id(),
            command = %command,
            duration_ms = duration.as_millis() as u64,
            "Ingest completed"
        );

        Ok(IngestReport {
            payload_id: *payload.id(),
            command,
            logs: output.logs,
            duration,
        })
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }
}
