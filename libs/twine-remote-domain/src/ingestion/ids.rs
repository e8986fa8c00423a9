use std::fmt;
use uuid::Uuid;

/// Unique identifier for a received payload
///
/// Wraps a UUID v7 so payload files sort by arrival time and never collide
/// between concurrent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadId(Uuid);

impl PayloadId {
    /// Generate a new time-ordered PayloadId
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PayloadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PayloadId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PayloadId> for Uuid {
    fn from(id: PayloadId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_ids_are_unique() {
        assert_ne!(PayloadId::new(), PayloadId::new());
    }

    #[test]
    fn test_payload_id_is_version_7() {
        assert_eq!(PayloadId::new().as_uuid().get_version_num(), 7);
    }

    #[test]
    fn test_payload_id_display() {
        let id = PayloadId::new();
        assert_eq!(id.to_string().len(), 36);
    }
}
