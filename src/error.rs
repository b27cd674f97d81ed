//! Error types for the hub server

use thiserror::Error;

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    /// Socket I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket handshake or protocol failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The client did not finish the upgrade in time
    #[error("WebSocket handshake timed out")]
    HandshakeTimeout,
}

/// Result type for hub server operations
pub type Result<T> = std::result::Result<T, Error>;
