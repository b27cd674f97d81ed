//! WebSocket subscribe server
//!
//! Accepts TCP connections, upgrades `GET /subscribe/{room_id}` to a
//! WebSocket and runs each connection as a subscriber of the shared [`Hub`].
//!
//! [`Hub`]: crate::hub::Hub

pub mod config;
pub mod handler;
pub mod listener;
pub mod route;

pub use config::ServerConfig;
pub use handler::{AcceptAll, SubscribeHandler};
pub use listener::{HubServer, CLOSE_ROOM_NOT_FOUND};
pub use route::{parse_subscribe_path, RouteError};
