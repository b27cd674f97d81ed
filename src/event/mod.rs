//! Room events
//!
//! A [`RoomEvent`] pairs a payload with the room it is routed to. Events exist
//! only for the duration of one publish; nothing is stored or replayed.

pub mod payload;

pub use payload::{EventKind, EventPayload};

use crate::registry::RoomId;

/// An event targeted at the subscribers of one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEvent {
    /// Target room (routing only, not serialized)
    pub room: RoomId,
    /// Kind-tagged payload
    pub payload: EventPayload,
}

impl RoomEvent {
    /// Create an event from a payload
    pub fn new(room: impl Into<RoomId>, payload: EventPayload) -> Self {
        Self {
            room: room.into(),
            payload,
        }
    }

    /// A message was posted
    pub fn message_created(
        room: impl Into<RoomId>,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            room,
            EventPayload::MessageCreated {
                id: id.into(),
                message: message.into(),
            },
        )
    }

    /// A reaction was added; `count` is the new total
    pub fn message_reaction_increased(
        room: impl Into<RoomId>,
        id: impl Into<String>,
        count: i64,
    ) -> Self {
        Self::new(
            room,
            EventPayload::MessageReactionIncreased {
                id: id.into(),
                count,
            },
        )
    }

    /// A reaction was removed; `count` is the new total
    pub fn message_reaction_decreased(
        room: impl Into<RoomId>,
        id: impl Into<String>,
        count: i64,
    ) -> Self {
        Self::new(
            room,
            EventPayload::MessageReactionDecreased {
                id: id.into(),
                count,
            },
        )
    }

    /// A message was marked as answered
    pub fn message_answered(room: impl Into<RoomId>, id: impl Into<String>) -> Self {
        Self::new(room, EventPayload::MessageAnswered { id: id.into() })
    }

    /// Kind tag of the payload
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let created = RoomEvent::message_created("r1", "m1", "hi");
        assert_eq!(created.room, RoomId::new("r1"));
        assert_eq!(created.kind(), EventKind::MessageCreated);

        let up = RoomEvent::message_reaction_increased("r1", "m1", 2);
        assert_eq!(up.kind(), EventKind::MessageReactionIncreased);

        let down = RoomEvent::message_reaction_decreased("r1", "m1", 1);
        assert_eq!(down.kind(), EventKind::MessageReactionDecreased);

        let answered = RoomEvent::message_answered("r1", "m1");
        assert_eq!(answered.kind(), EventKind::MessageAnswered);
        assert_eq!(answered.payload.id(), "m1");
    }

    #[test]
    fn test_room_not_on_wire() {
        let event = RoomEvent::message_answered("secret-room", "m1");
        let frame = event.payload.encode().unwrap();
        let text = std::str::from_utf8(&frame).unwrap();
        assert!(!text.contains("secret-room"));
    }
}
