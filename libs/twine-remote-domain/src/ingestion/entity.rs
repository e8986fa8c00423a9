//! Domain entities for payload ingestion
//!
//! A Payload describes one request body handed to the remote control. The
//! bytes themselves are not kept in the entity; they travel alongside it to
//! the store and are forgotten once written.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::ingestion::ids::PayloadId;

/// Metadata of a received payload
///
/// # Example
///
/// ```rust
/// use twine_remote_domain::Payload;
///
/// let payload = Payload::new(b"<s> <p> <o> .\n");
/// assert_eq!(payload.size(), 14);
/// assert!(!payload.is_persisted());
/// ```
#[derive(Debug, Clone)]
pub struct Payload {
    id: PayloadId,

    /// Size of the body in bytes
    size_bytes: usize,

    received_at: DateTime<Utc>,

    /// File the body was written to, set once persisted
    location: Option<PathBuf>,
}

impl Payload {
    /// Describe a freshly received body
    pub fn new(data: &[u8]) -> Self {
        Self {
            id: PayloadId::new(),
            size_bytes: data.len(),
            received_at: Utc::now(),
            location: None,
        }
    }

    pub fn id(&self) -> &PayloadId {
        &self.id
    }

    pub fn size(&self) -> usize {
        self.size_bytes
    }

    pub fn received_at(&self) -> &DateTime<Utc> {
        &self.received_at
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Record where the store wrote the body
    pub fn set_location(&mut self, location: PathBuf) {
        self.location = Some(location);
    }

    pub fn is_persisted(&self) -> bool {
        self.location.is_some()
    }
}
