//! Infrastructure adapters

mod file_store;
mod process_runner;

pub use file_store::FilePayloadStore;
pub use process_runner::{ProcessIngestRunner, DEFAULT_TIMEOUT};
