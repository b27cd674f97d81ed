//! Handler context
//!
//! Context passed to [`SubscribeHandler`](crate::server::SubscribeHandler)
//! callbacks describing the connection being subscribed.

use std::net::SocketAddr;

use crate::registry::RoomId;

/// Context passed to subscribe handler callbacks
#[derive(Debug, Clone)]
pub struct SubscriberContext {
    /// Room requested in the subscribe path
    pub room: RoomId,

    /// Remote peer address
    pub peer_addr: SocketAddr,

    /// Raw request path
    pub path: String,
}

impl SubscriberContext {
    /// Create a new context
    pub fn new(room: RoomId, peer_addr: SocketAddr, path: impl Into<String>) -> Self {
        Self {
            room,
            peer_addr,
            path: path.into(),
        }
    }
}
