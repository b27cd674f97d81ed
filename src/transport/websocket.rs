//! WebSocket transport
//!
//! Writes each event frame as one text message. Inbound data frames from the
//! client are read and discarded; reading is what surfaces close frames and
//! lets tungstenite answer pings.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::{Message, Utf8Bytes};
use tokio_tungstenite::WebSocketStream;

use super::{Transport, TransportError};

/// Subscriber transport over an upgraded WebSocket connection
pub struct WebSocketTransport<S> {
    ws: WebSocketStream<S>,
}

impl<S> WebSocketTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Wrap an upgraded stream
    pub fn new(ws: WebSocketStream<S>) -> Self {
        Self { ws }
    }
}

impl<S> Transport for WebSocketTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    async fn send(&mut self, frame: Bytes) -> Result<(), TransportError> {
        let text = Utf8Bytes::try_from(frame).map_err(|_| TransportError::InvalidFrame)?;
        self.ws.send(Message::Text(text)).await?;
        Ok(())
    }

    async fn closed(&mut self) {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(frame = ?frame, "Peer sent close frame");
                    return;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "WebSocket read failed");
                    return;
                }
                None => return,
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.ws.close(None).await {
            tracing::debug!(error = %e, "WebSocket close failed");
        }
    }
}
