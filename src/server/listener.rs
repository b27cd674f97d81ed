//! Hub server listener
//!
//! Handles the TCP accept loop, upgrades each connection to a WebSocket on
//! the subscribe endpoint and runs it as a hub subscriber.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Utf8Bytes};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::hub::Hub;
use crate::registry::RoomId;
use crate::server::config::ServerConfig;
use crate::server::handler::SubscribeHandler;
use crate::server::route::{parse_subscribe_path, RouteError};
use crate::session::SubscriberContext;
use crate::transport::WebSocketTransport;

/// Close code sent when the handler rejects a room
pub const CLOSE_ROOM_NOT_FOUND: u16 = 4004;

/// WebSocket subscribe server
pub struct HubServer<H: SubscribeHandler> {
    config: ServerConfig,
    handler: Arc<H>,
    hub: Hub,
    shutdown: CancellationToken,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl<H: SubscribeHandler> HubServer<H> {
    /// Create a new server with its own hub
    pub fn new(config: ServerConfig, handler: H) -> Self {
        let hub = Hub::with_config(config.hub.clone());
        Self::with_hub(config, handler, hub)
    }

    /// Create a new server around an existing hub
    ///
    /// Event producers keep a clone of `hub` to publish into.
    pub fn with_hub(config: ServerConfig, handler: H, hub: Hub) -> Self {
        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Self {
            config,
            handler: Arc::new(handler),
            hub,
            shutdown: CancellationToken::new(),
            connection_semaphore,
        }
    }

    /// The hub subscribers are registered in
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Token cancelled when the server shuts down
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// Only returns if binding fails. Use [`run_until`](Self::run_until) for
    /// graceful shutdown.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve connections from an already bound listener
    ///
    /// When `shutdown` resolves, every active subscriber is cancelled.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(addr = %listener.local_addr()?, "Hub server listening");

        let result = tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.accept_loop(&listener) => result,
        };

        self.shutdown.cancel();

        result
    }

    async fn accept_loop(&self, listener: &TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match sem.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(peer = %peer_addr, "Connection rejected: limit reached");
                    return;
                }
            }
        } else {
            None
        };

        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::error!(error = %e, "Failed to configure socket");
                return;
            }
        }

        tracing::debug!(peer = %peer_addr, "New connection");

        let config = self.config.clone();
        let handler = Arc::clone(&self.handler);
        let hub = self.hub.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let _permit = permit;

            let result =
                serve_connection(socket, peer_addr, &config, handler.as_ref(), &hub, &shutdown).await;
            if let Err(e) = result {
                tracing::debug!(peer = %peer_addr, error = %e, "Connection error");
            }

            tracing::debug!(peer = %peer_addr, "Connection closed");
        });
    }
}

fn reject(err: &RouteError) -> ErrorResponse {
    let mut response = ErrorResponse::new(Some(err.body().to_string()));
    *response.status_mut() = err.status();
    response
}

async fn serve_connection<H: SubscribeHandler>(
    socket: TcpStream,
    peer_addr: SocketAddr,
    config: &ServerConfig,
    handler: &H,
    hub: &Hub,
    shutdown: &CancellationToken,
) -> Result<()> {
    let mut route: Option<(RoomId, String)> = None;

    let callback = |req: &Request,
                    response: Response|
     -> std::result::Result<Response, ErrorResponse> {
        let path = req.uri().path();
        match parse_subscribe_path(&config.subscribe_path, path) {
            Ok(room) => {
                route = Some((room, path.to_string()));
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(
                    peer = %peer_addr,
                    path = path,
                    error = %e,
                    "Rejected subscribe request"
                );
                Err(reject(&e))
            }
        }
    };

    let upgrade = tokio_tungstenite::accept_hdr_async(socket, callback);
    let mut ws = match tokio::time::timeout(config.handshake_timeout, upgrade).await {
        Ok(Ok(ws)) => ws,
        // Route rejections were already logged by the callback
        Ok(Err(e @ tungstenite::Error::Http(_))) => return Err(Error::WebSocket(e)),
        Ok(Err(e)) => {
            tracing::warn!(peer = %peer_addr, error = %e, "Failed to upgrade connection");
            return Err(Error::WebSocket(e));
        }
        Err(_) => return Err(Error::HandshakeTimeout),
    };

    let Some((room, path)) = route else {
        return Ok(());
    };

    let ctx = SubscriberContext::new(room.clone(), peer_addr, path);

    if !handler.on_subscribe(&ctx).await {
        tracing::info!(room_id = %room, client_ip = %peer_addr, "Subscription rejected");
        let frame = CloseFrame {
            code: CloseCode::from(CLOSE_ROOM_NOT_FOUND),
            reason: Utf8Bytes::from_static("room not found"),
        };
        if let Err(e) = ws.close(Some(frame)).await {
            tracing::debug!(peer = %peer_addr, error = %e, "Failed to close rejected connection");
        }
        return Ok(());
    }

    tracing::info!(room_id = %room, client_ip = %peer_addr, "New client connected");

    let exit = hub
        .subscribe(room, WebSocketTransport::new(ws), shutdown)
        .await;
    handler.on_unsubscribe(&ctx, &exit).await;

    Ok(())
}
