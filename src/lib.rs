//! Room-scoped publish/subscribe hub
//!
//! Clients open a long-lived WebSocket scoped to a room and receive a JSON
//! notification whenever something happens in that room. Producers hand
//! events to the [`Hub`] without waiting for delivery.
//!
//! ```no_run
//! use room_hub::{AcceptAll, HubServer, RoomEvent, ServerConfig};
//!
//! # async fn demo() -> room_hub::Result<()> {
//! let server = HubServer::new(ServerConfig::default(), AcceptAll);
//! let hub = server.hub().clone();
//!
//! // Somewhere in a request handler, after the message was stored:
//! hub.publish(RoomEvent::message_created(
//!     "67e55044-10b1-426f-9247-bb680e5fe0c8",
//!     "0f8fad5b-d9cb-469f-a165-70867728950e",
//!     "hello",
//! ));
//!
//! server.run().await
//! # }
//! ```
//!
//! Subscribers connect to `ws://host/subscribe/{room_id}` and receive frames
//! such as `{"kind":"message_created","value":{"id":"...","message":"hello"}}`.

pub mod error;
pub mod event;
pub mod hub;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;
pub mod transport;

pub use error::{Error, Result};
pub use event::{EventKind, EventPayload, RoomEvent};
pub use hub::{Hub, HubConfig};
pub use registry::{RoomId, SubscriberId, SubscriberRegistry};
pub use server::{AcceptAll, HubServer, ServerConfig, SubscribeHandler};
pub use session::{ExitReason, SubscriberContext, SubscriberExit};
pub use stats::{HubStats, SubscriberStats};
pub use transport::{ChannelPeer, ChannelTransport, Transport, TransportError, WebSocketTransport};
