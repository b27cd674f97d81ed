//! Subscriber registry for room-scoped pub/sub routing
//!
//! The registry tracks every connected subscriber, grouped by the room it
//! subscribed to. Each subscriber is represented by a [`SubscriberHandle`]:
//! the sending half of its bounded outbound queue plus its cancellation token.
//!
//! # Architecture
//!
//! ```text
//!                       SubscriberRegistry
//!                 ┌───────────────────────────────┐
//!                 │ Mutex<HashMap<RoomId,         │
//!                 │   HashMap<SubscriberId,       │
//!                 │     SubscriberHandle {        │
//!                 │       outbound: mpsc::Tx,     │
//!                 │       cancel: Token,          │
//!                 │     }>>>                      │
//!                 └───────────────┬───────────────┘
//!                                 │
//!      ┌──────────────────────────┼──────────────────────────┐
//!      │                          │                          │
//!      ▼                          ▼                          ▼
//! [Producer]               [Subscriber task]          [Subscriber task]
//! hub.publish()            outbound_rx.recv()         outbound_rx.recv()
//!      │                          │                          │
//!      └──► for_each() ─► try_send() ──► transport.send() ──► socket
//! ```
//!
//! # Shared Frames
//!
//! An event is serialized once per publish. The resulting `bytes::Bytes` frame
//! is reference counted, so every subscriber queue holds the same allocation.

pub mod error;
pub mod room;
pub mod store;
pub mod subscriber;

pub use error::{DeliveryError, InvalidRoomId};
pub use room::RoomId;
pub use store::SubscriberRegistry;
pub use subscriber::{SubscriberHandle, SubscriberId};
