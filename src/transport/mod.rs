//! Subscriber transports
//!
//! A transport is the connection one subscriber receives frames over. It is
//! owned by that subscriber's lifecycle task, which is its only writer.
//!
//! - [`WebSocketTransport`]: one text message per event
//! - [`ChannelTransport`]: in-process delivery, paired with a [`ChannelPeer`]

pub mod channel;
pub mod websocket;

pub use channel::{ChannelPeer, ChannelTransport};
pub use websocket::WebSocketTransport;

use std::future::Future;

use bytes::Bytes;
use thiserror::Error;

/// Error writing to a transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer is gone
    #[error("transport closed")]
    Closed,
    /// Frame is not valid UTF-8 and cannot go out as a text message
    #[error("frame is not valid UTF-8")]
    InvalidFrame,
    /// WebSocket protocol or I/O failure
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Connection a subscriber receives event frames over
pub trait Transport: Send + 'static {
    /// Write one frame
    fn send(&mut self, frame: Bytes) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Resolve once the peer has gone away
    ///
    /// Must be cancel-safe: the lifecycle drops this future whenever a frame
    /// is ready to be written and polls a fresh one afterwards.
    fn closed(&mut self) -> impl Future<Output = ()> + Send;

    /// Release the connection
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
