//! Registry error types
//!
//! Registration itself cannot fail. These errors cover parsing room
//! identifiers and handing a frame to a single subscriber.

use thiserror::Error;

/// Error returned when a frame cannot be queued for a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The subscriber's outbound queue is full (subscriber is too slow)
    #[error("subscriber outbound queue is full")]
    QueueFull,
    /// The subscriber's lifecycle has already ended
    #[error("subscriber outbound queue is closed")]
    Closed,
}

/// Error returned when a room identifier is not a textual UUID
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid room id: {raw:?}")]
pub struct InvalidRoomId {
    /// The rejected input
    pub raw: String,
}
