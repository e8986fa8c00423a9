//! Subprocess Ingest Runner
//!
//! Implements the `IngestRunner` port by spawning the ingest program directly
//! with its argument vector. Standard output and standard error are merged line
//! by line in the order they arrive.

use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};
use twine_remote_domain::{
    ingestion::{
        command::{ExitState, Invocation, RunOutput},
        error::IngestionError,
    },
    ports::IngestRunner,
};

/// Time bound applied when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Runs invocations as child processes
///
/// At most `max_concurrent` children run at once; further calls wait for a
/// slot. A child still running when its time bound expires, or when the calling
/// future is dropped, is killed.
#[derive(Clone)]
pub struct ProcessIngestRunner {
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl ProcessIngestRunner {
    pub fn new(timeout: Duration, max_concurrent: usize) -> Self {
        info!(
            timeout_secs = timeout.as_secs(),
            max_concurrent, "Initializing ProcessIngestRunner"
        );
        Self {
            timeout,
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ProcessIngestRunner {
    /// One ingest at a time, bounded by [`DEFAULT_TIMEOUT`]
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, 1)
    }
}

impl IngestRunner for ProcessIngestRunner {
    #[instrument(skip(self, invocation), fields(command = %invocation))]
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl std::future::Future<Output = Result<RunOutput, IngestionError>> + Send {
        let invocation = invocation.clone();
        let timeout = self.timeout;
        let permits = self.permits.clone();

        async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| IngestionError::internal_error("ingest runner is closed"))?;

            let command = invocation.to_string();
            debug!(command = %command, "Spawning ingest command");

            let mut child = Command::new(invocation.program())
                .args(invocation.args())
                .arg(invocation.payload_path())
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|err| {
                    error!(program = %invocation.program(), error = %err, "Failed to spawn ingest command");
                    IngestionError::spawn_failure(invocation.program(), err.to_string())
                })?;

            let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
                (Some(stdout), Some(stderr)) => (stdout, stderr),
                _ => {
                    return Err(IngestionError::internal_error(
                        "child output pipes were not captured",
                    ))
                }
            };

            let mut logs = MergedLogs::default();
            let finished = tokio::time::timeout(timeout, async {
                collect_merged(stdout, stderr, &mut logs).await?;
                child.wait().await
            })
            .await;
            let logs = logs.into_text();

            match finished {
                Ok(Ok(status)) => {
                    let status = exit_state(status);
                    debug!(?status, log_bytes = logs.len(), "Ingest command finished");
                    Ok(RunOutput { status, logs })
                }
                Ok(Err(err)) => {
                    error!(error = %err, "Lost track of ingest command");
                    Err(IngestionError::internal_error(format!(
                        "waiting for '{}' failed: {}",
                        command, err
                    )))
                }
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "Ingest command timed out, killing it");
                    if let Err(err) = child.kill().await {
                        warn!(error = %err, "Failed to kill timed out ingest command");
                    }
                    Err(IngestionError::Timeout {
                        command,
                        timeout,
                        logs,
                    })
                }
            }
        }
    }
}

/// Merged output of a child, with the unterminated tail of each stream
///
/// Lives outside the timed future so a timeout keeps what was read so far.
#[derive(Debug, Default)]
struct MergedLogs {
    text: String,
    out_line: Vec<u8>,
    err_line: Vec<u8>,
}

impl MergedLogs {
    fn flush(text: &mut String, line: &mut Vec<u8>) {
        if !line.is_empty() {
            text.push_str(&String::from_utf8_lossy(line));
            line.clear();
        }
    }

    /// Everything read, stdout's partial line before stderr's
    fn into_text(mut self) -> String {
        Self::flush(&mut self.text, &mut self.out_line);
        Self::flush(&mut self.text, &mut self.err_line);
        self.text
    }
}

/// Read two streams to their end, appending whole lines to `logs` as they arrive
///
/// A last line without a newline is appended when its stream closes.
async fn collect_merged<O, E>(stdout: O, stderr: E, logs: &mut MergedLogs) -> std::io::Result<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut stdout = BufReader::new(stdout);
    let mut stderr = BufReader::new(stderr);
    let mut out_open = true;
    let mut err_open = true;

    // read_until keeps partial lines in the buffer when the other branch wins
    while out_open || err_open {
        tokio::select! {
            read = stdout.read_until(b'\n', &mut logs.out_line), if out_open => {
                out_open = read? != 0;
                MergedLogs::flush(&mut logs.text, &mut logs.out_line);
            }
            read = stderr.read_until(b'\n', &mut logs.err_line), if err_open => {
                err_open = read? != 0;
                MergedLogs::flush(&mut logs.text, &mut logs.err_line);
            }
        }
    }

    Ok(())
}

fn exit_state(status: ExitStatus) -> ExitState {
    if let Some(code) = status.code() {
        return ExitState::Code(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitState::Signal(signal);
        }
    }

    ExitState::Unknown
}
