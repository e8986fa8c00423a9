//! Ingest command model
//!
//! The external ingester is always invoked as an argument vector: the program,
//! its fixed arguments, then the payload path. Nothing here is ever handed to a
//! shell; the joined string form exists only for reporting.

use std::fmt;
use std::path::{Path, PathBuf};

/// Program used when none is configured
pub const DEFAULT_PROGRAM: &str = "twine";

/// Arguments placed before the payload path by default
pub const DEFAULT_ARGS: [&str; 3] = ["-d", "-c", "/usr/etc/twine.conf"];

/// The external ingest command, not yet bound to a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestCommand {
    program: String,
    args: Vec<String>,
}

impl IngestCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Bind the command to a payload file, which becomes the last argument
    pub fn bind(&self, payload_path: impl Into<PathBuf>) -> Invocation {
        Invocation {
            program: self.program.clone(),
            args: self.args.clone(),
            payload_path: payload_path.into(),
        }
    }
}

impl Default for IngestCommand {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROGRAM,
            DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect(),
        )
    }
}

/// An ingest command bound to one payload file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    payload_path: PathBuf,
}

impl Invocation {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Fixed arguments, without the payload path
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn payload_path(&self) -> &Path {
        &self.payload_path
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        write!(f, " {}", self.payload_path.display())
    }
}

/// How the ingest subprocess ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Exited on its own with this status code
    Code(i32),
    /// Terminated by a signal
    Signal(i32),
    /// The platform reported neither a code nor a signal
    Unknown,
}

impl ExitState {
    pub fn success(&self) -> bool {
        matches!(self, ExitState::Code(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitState::Code(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Code(code) => write!(f, "returned non-zero exit status {}", code),
            ExitState::Signal(signal) => write!(f, "died with signal {}", signal),
            ExitState::Unknown => write!(f, "ended with an unknown status"),
        }
    }
}

/// What a runner observed while executing an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub status: ExitState,
    /// Standard output and standard error merged in arrival order
    pub logs: String,
}
