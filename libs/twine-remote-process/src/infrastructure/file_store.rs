//! Filesystem Payload Store
//!
//! Implements the `PayloadStore` port with one file per payload. File names are
//! derived from the payload id, so two requests never write the same file.
//! Each file is held as a [`TempPath`] and deleted when that handle drops.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::{Builder, TempPath};
use tokio::task;
use tracing::{debug, error, instrument};
use twine_remote_domain::{
    ingestion::{entity::Payload, error::IngestionError, ids::PayloadId},
    ports::PayloadStore,
};

/// Directory-backed implementation of the PayloadStore port
#[derive(Debug, Clone)]
pub struct FilePayloadStore {
    dir: PathBuf,
}

impl FilePayloadStore {
    /// Store payloads under `dir`, created on first write if missing
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store payloads in the system temporary directory
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding a payload
    ///
    /// N-Quads extension, as the ingester expects.
    pub fn path_for(&self, payload_id: &PayloadId) -> PathBuf {
        self.dir.join(file_name(payload_id))
    }
}

fn file_name(payload_id: &PayloadId) -> String {
    format!("remote-data-{}.nq", payload_id)
}

/// Create the payload file exclusively and fill it
fn write_payload(dir: &Path, name: &str, data: &[u8]) -> std::io::Result<TempPath> {
    std::fs::create_dir_all(dir)?;
    let mut file = Builder::new()
        .prefix(name)
        .rand_bytes(0)
        .tempfile_in(dir)?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file.into_temp_path())
}

impl PayloadStore for FilePayloadStore {
    type Stored = TempPath;

    #[instrument(skip(self, payload, data), fields(payload_id = %payload.id(), data_size = data.len()))]
    fn save(
        &self,
        payload: &Payload,
        data: Bytes,
    ) -> impl std::future::Future<Output = Result<TempPath, IngestionError>> + Send {
        let dir = self.dir.clone();
        let name = file_name(payload.id());

        async move {
            let written = task::spawn_blocking(move || {
                let result = write_payload(&dir, &name, &data);
                (dir.join(&name), result)
            })
            .await
            .map_err(|err| {
                IngestionError::internal_error(format!("payload writer failed: {}", err))
            })?;

            match written {
                (path, Ok(stored)) => {
                    debug!(path = %path.display(), "Wrote payload file");
                    Ok(stored)
                }
                (path, Err(err)) => {
                    error!(path = %path.display(), error = %err, "Failed to write payload file");
                    Err(IngestionError::storage_failure(format!(
                        "cannot write '{}': {}",
                        path.display(),
                        err
                    )))
                }
            }
        }
    }

    #[instrument(skip(self, stored), fields(path = %stored.display()))]
    fn remove(
        &self,
        stored: TempPath,
    ) -> impl std::future::Future<Output = Result<(), IngestionError>> + Send {
        let path = stored.to_path_buf();

        async move {
            let closed = task::spawn_blocking(move || stored.close())
                .await
                .map_err(|err| {
                    IngestionError::internal_error(format!("payload remover failed: {}", err))
                })?;

            match closed {
                Ok(()) => {
                    debug!("Removed payload file");
                    Ok(())
                }
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(IngestionError::storage_failure(format!(
                    "cannot remove '{}': {}",
                    path.display(),
                    err
                ))),
            }
        }
    }
}
