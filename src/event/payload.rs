//! Event payloads and their wire form
//!
//! Every event goes out as one JSON envelope `{"kind": ..., "value": ...}`.
//! The room is routing information only and never appears on the wire.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Kind tag of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A message was posted to the room
    MessageCreated,
    /// A message's reaction count went up
    MessageReactionIncreased,
    /// A message's reaction count went down
    MessageReactionDecreased,
    /// A message was marked as answered
    MessageAnswered,
}

impl EventKind {
    /// The wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MessageCreated => "message_created",
            EventKind::MessageReactionIncreased => "message_reaction_increased",
            EventKind::MessageReactionDecreased => "message_reaction_decreased",
            EventKind::MessageAnswered => "message_answered",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific event payload
///
/// Serializes as the full envelope, e.g.
/// `{"kind":"message_answered","value":{"id":"..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EventPayload {
    /// `message_created`
    MessageCreated {
        /// Id of the new message
        id: String,
        /// Message text
        message: String,
    },
    /// `message_reaction_increased`
    MessageReactionIncreased {
        /// Id of the message
        id: String,
        /// Reaction count after the change
        count: i64,
    },
    /// `message_reaction_decreased`
    MessageReactionDecreased {
        /// Id of the message
        id: String,
        /// Reaction count after the change
        count: i64,
    },
    /// `message_answered`
    MessageAnswered {
        /// Id of the message
        id: String,
    },
}

impl EventPayload {
    /// Kind tag of this payload
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::MessageCreated { .. } => EventKind::MessageCreated,
            EventPayload::MessageReactionIncreased { .. } => EventKind::MessageReactionIncreased,
            EventPayload::MessageReactionDecreased { .. } => EventKind::MessageReactionDecreased,
            EventPayload::MessageAnswered { .. } => EventKind::MessageAnswered,
        }
    }

    /// Id of the affected entity
    pub fn id(&self) -> &str {
        match self {
            EventPayload::MessageCreated { id, .. }
            | EventPayload::MessageReactionIncreased { id, .. }
            | EventPayload::MessageReactionDecreased { id, .. }
            | EventPayload::MessageAnswered { id } => id,
        }
    }

    /// Serialize into a single wire frame
    pub fn encode(&self) -> serde_json::Result<Bytes> {
        serde_json::to_vec(self).map(Bytes::from)
    }

    /// Parse a wire frame
    pub fn decode(frame: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(frame)
    }
}
