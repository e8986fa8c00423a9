//! Domain errors for ingestion operations
//!
//! Every failure of a remote ingest is one of these variants. Adapters convert
//! their I/O errors into them so the HTTP layer only ever sees domain errors.

use std::time::Duration;

use thiserror::Error;

use crate::ingestion::command::ExitState;

/// Errors that can occur while ingesting a payload
#[derive(Error, Debug)]
pub enum IngestionError {
    /// The ingest command ran and did not exit with status zero
    #[error("Command '{command}' {status}.")]
    CommandFailed {
        command: String,
        status: ExitState,
        logs: String,
    },

    /// The ingest command exceeded its time bound and was killed
    #[error("Command '{command}' timed out after {timeout:?}.")]
    Timeout {
        command: String,
        timeout: Duration,
        logs: String,
    },

    /// The ingest command could not be started
    #[error("Failed to start '{program}': {reason}")]
    SpawnFailure { program: String, reason: String },

    /// The payload is larger than the configured bound
    #[error("Payload size ({size} bytes) exceeds maximum allowed ({max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    /// Failed to write or remove the payload file
    #[error("Storage operation failed: {0}")]
    StorageFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IngestionError {
    pub fn storage_failure(msg: impl Into<String>) -> Self {
        Self::StorageFailure(msg.into())
    }

    pub fn payload_too_large(size: usize, max: usize) -> Self {
        Self::PayloadTooLarge { size, max }
    }

    pub fn spawn_failure(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SpawnFailure {
            program: program.into(),
            reason: reason.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Output captured from the ingest command, when it got far enough to produce any
    pub fn logs(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { logs, .. } | Self::Timeout { logs, .. } => Some(logs),
            _ => None,
        }
    }
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let err = IngestionError::CommandFailed {
            command: "twine -d -c /usr/etc/twine.conf /tmp/p.nq".to_string(),
            status: ExitState::Code(1),
            logs: "parse error\n".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Command 'twine -d -c /usr/etc/twine.conf /tmp/p.nq' returned non-zero exit status 1."
        );
        assert_eq!(err.logs(), Some("parse error\n"));
    }

    #[test]
    fn test_timeout_message() {
        let err = IngestionError::Timeout {
            command: "twine /tmp/p.nq".to_string(),
            timeout: Duration::from_secs(300),
            logs: String::new(),
        };

        assert!(err.to_string().contains("timed out after 300s"));
        assert_eq!(err.logs(), Some(""));
    }

    #[test]
    fn test_payload_too_large_error() {
        let err = IngestionError::payload_too_large(1024, 512);
        assert!(matches!(err, IngestionError::PayloadTooLarge { .. }));
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("512"));
        assert!(err.logs().is_none());
    }

    #[test]
    fn test_spawn_failure_error() {
        let err = IngestionError::spawn_failure("twine", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Failed to start 'twine': No such file or directory"
        );
    }

    #[test]
    fn test_storage_failure_error() {
        let err = IngestionError::storage_failure("disk full");
        assert_eq!(err.to_string(), "Storage operation failed: disk full");
    }
}
