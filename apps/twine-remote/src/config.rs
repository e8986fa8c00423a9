//! Runtime configuration
//!
//! Every setting has a default equal to the constant the remote control always
//! used; environment variables only override them.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use twine_remote_domain::ingestion::command::{DEFAULT_ARGS, DEFAULT_PROGRAM};
use twine_remote_domain::{IngestCommand, IngestionConfig, IngestionError};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 100 * 1024 * 1024;
pub const DEFAULT_MAX_CONCURRENT_INGESTS: usize = 1;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = IngestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(IngestionError::config_error(format!(
                "unknown log format '{}' (expected 'text' or 'json')",
                other
            ))),
        }
    }
}

/// Settings of the remote control process
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub command: IngestCommand,
    /// Directory receiving per-request payload files
    pub data_dir: PathBuf,
    pub timeout: Duration,
    pub max_payload_bytes: usize,
    pub max_concurrent_ingests: usize,
    pub log_format: LogFormat,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            command: IngestCommand::default(),
            data_dir: std::env::temp_dir(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            max_concurrent_ingests: DEFAULT_MAX_CONCURRENT_INGESTS,
            log_format: LogFormat::Text,
        }
    }
}

impl RemoteConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, IngestionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IngestionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let program = get("TWINE_REMOTE_PROGRAM").unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
        let args = match get("TWINE_REMOTE_ARGS") {
            Some(args) => args.split_whitespace().map(str::to_string).collect(),
            None => DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect(),
        };

        let timeout_secs: u64 = parse_or(
            get("TWINE_REMOTE_TIMEOUT_SECS"),
            "TWINE_REMOTE_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(IngestionError::config_error(
                "TWINE_REMOTE_TIMEOUT_SECS must be greater than zero",
            ));
        }

        let max_concurrent_ingests = parse_or(
            get("TWINE_REMOTE_MAX_CONCURRENT_INGESTS"),
            "TWINE_REMOTE_MAX_CONCURRENT_INGESTS",
            DEFAULT_MAX_CONCURRENT_INGESTS,
        )?;
        if max_concurrent_ingests == 0 {
            return Err(IngestionError::config_error(
                "TWINE_REMOTE_MAX_CONCURRENT_INGESTS must be greater than zero",
            ));
        }

        let log_format = match get("TWINE_REMOTE_LOG_FORMAT") {
            Some(format) => format.parse()?,
            None => LogFormat::Text,
        };

        Ok(Self {
            host: get("TWINE_REMOTE_HOST").unwrap_or(defaults.host),
            port: parse_or(get("TWINE_REMOTE_PORT"), "TWINE_REMOTE_PORT", DEFAULT_PORT)?,
            command: IngestCommand::new(program.trim(), args),
            data_dir: get("TWINE_REMOTE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            timeout: Duration::from_secs(timeout_secs),
            max_payload_bytes: parse_or(
                get("TWINE_REMOTE_MAX_PAYLOAD_BYTES"),
                "TWINE_REMOTE_MAX_PAYLOAD_BYTES",
                DEFAULT_MAX_PAYLOAD_BYTES,
            )?,
            max_concurrent_ingests,
            log_format,
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn ingestion_config(&self) -> IngestionConfig {
        IngestionConfig {
            command: self.command.clone(),
            max_payload_size: self.max_payload_bytes,
        }
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, IngestionError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|err| {
            IngestionError::config_error(format!("{} has invalid value '{}': {}", key, raw, err))
        }),
    }
}
