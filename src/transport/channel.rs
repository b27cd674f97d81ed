//! In-process transport
//!
//! Frames are handed to a [`ChannelPeer`] over an unbounded channel. Dropping
//! (or closing) the peer behaves like a client disconnect.

use bytes::Bytes;
use tokio::sync::mpsc;

use super::{Transport, TransportError};
use crate::event::EventPayload;

/// Subscriber side of an in-process connection
#[derive(Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Bytes>,
}

/// Client side of an in-process connection
#[derive(Debug)]
pub struct ChannelPeer {
    rx: mpsc::UnboundedReceiver<Bytes>,
}

impl ChannelTransport {
    /// Create a connected transport/peer pair
    pub fn pair() -> (ChannelTransport, ChannelPeer) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelTransport { tx }, ChannelPeer { rx })
    }
}

impl Transport for ChannelTransport {
    async fn send(&mut self, frame: Bytes) -> Result<(), TransportError> {
        self.tx.send(frame).map_err(|_| TransportError::Closed)
    }

    async fn closed(&mut self) {
        self.tx.closed().await
    }

    async fn close(&mut self) {}
}

impl ChannelPeer {
    /// Receive the next raw frame
    ///
    /// Returns `None` once the subscriber side has closed and every frame
    /// has been drained.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Receive and decode the next frame
    ///
    /// Frames that fail to decode are skipped.
    pub async fn recv_event(&mut self) -> Option<EventPayload> {
        while let Some(frame) = self.rx.recv().await {
            match EventPayload::decode(&frame) {
                Ok(payload) => return Some(payload),
                Err(e) => tracing::debug!(error = %e, "Skipping undecodable frame"),
            }
        }
        None
    }

    /// Take a frame if one is already waiting
    pub fn try_recv(&mut self) -> Option<Bytes> {
        self.rx.try_recv().ok()
    }

    /// Disconnect from the subscriber side
    pub fn close(&mut self) {
        self.rx.close();
    }
}
