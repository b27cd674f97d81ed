//! Room identifiers

use std::fmt;
use std::sync::Arc;

use super::error::InvalidRoomId;

/// Identifier of a room
///
/// Opaque text used as the registry key. Two identifiers are the same room
/// exactly when their text is equal; no normalization is applied, so the form
/// a producer publishes with must match the form subscribers connected with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(Arc<str>);

impl RoomId {
    /// Create a room id from arbitrary text
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::from(id.into()))
    }

    /// Parse a room id that must be a textual UUID
    ///
    /// The original text is kept as-is; it is only validated.
    pub fn parse(raw: &str) -> Result<Self, InvalidRoomId> {
        uuid::Uuid::parse_str(raw).map_err(|_| InvalidRoomId {
            raw: raw.to_string(),
        })?;
        Ok(Self::new(raw))
    }

    /// The identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid() {
        let room = RoomId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(room.as_str(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_parse_keeps_original_text() {
        let upper = RoomId::parse("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        let lower = RoomId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();

        // Keys are compared syntactically
        assert_ne!(upper, lower);
        assert_eq!(upper.to_string(), "67E55044-10B1-426F-9247-BB680E5FE0C8");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = RoomId::parse("not-a-room").unwrap_err();
        assert_eq!(err.raw, "not-a-room");
        assert!(RoomId::parse("").is_err());
    }

    #[test]
    fn test_equal_text_is_same_room() {
        assert_eq!(RoomId::new("r1"), RoomId::from("r1"));
        assert_eq!(RoomId::from(String::from("r1")), RoomId::new("r1"));
        assert_ne!(RoomId::new("r1"), RoomId::new("r2"));
    }
}
