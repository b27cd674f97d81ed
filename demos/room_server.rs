//! Room hub server example
//!
//! Run with: cargo run --example room_server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example room_server                    # binds to 0.0.0.0:8080
//!   cargo run --example room_server localhost          # binds to 127.0.0.1:8080
//!   cargo run --example room_server 127.0.0.1:9000     # binds to 127.0.0.1:9000
//!
//! ## Subscribing
//!
//! With websocat:
//!   websocat ws://localhost:8080/subscribe/67e55044-10b1-426f-9247-bb680e5fe0c8
//!
//! The demo publishes a message, a couple of reaction changes and an answer
//! to that room every few seconds so there is something to watch.

use std::net::SocketAddr;
use std::time::Duration;

use room_hub::{
    Hub, HubServer, RoomEvent, ServerConfig, SubscribeHandler, SubscriberContext, SubscriberExit,
};

const DEMO_ROOM: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

/// Handler that only logs connections
struct LoggingHandler;

impl SubscribeHandler for LoggingHandler {
    async fn on_subscribe(&self, ctx: &SubscriberContext) -> bool {
        tracing::info!(room = %ctx.room, peer = %ctx.peer_addr, "Subscribe request");
        true
    }

    async fn on_unsubscribe(&self, ctx: &SubscriberContext, exit: &SubscriberExit) {
        tracing::info!(
            room = %ctx.room,
            peer = %ctx.peer_addr,
            reason = %exit.reason,
            frames = exit.stats.frames_sent,
            "Subscriber left"
        );
    }
}

/// Publish a scripted sequence of events to the demo room
async fn produce(hub: Hub) {
    let mut ticker = tokio::time::interval(Duration::from_secs(3));
    let mut n: i64 = 0;

    loop {
        ticker.tick().await;
        n += 1;
        let message_id = format!("demo-message-{n}");

        hub.publish(RoomEvent::message_created(
            DEMO_ROOM,
            message_id.clone(),
            format!("Question #{n}"),
        ));
        hub.publish(RoomEvent::message_reaction_increased(DEMO_ROOM, message_id.clone(), 1));
        hub.publish(RoomEvent::message_reaction_increased(DEMO_ROOM, message_id.clone(), 2));
        hub.publish(RoomEvent::message_reaction_decreased(DEMO_ROOM, message_id.clone(), 1));
        hub.publish(RoomEvent::message_answered(DEMO_ROOM, message_id));

        let stats = hub.stats();
        tracing::debug!(
            subscribers = stats.active_subscribers,
            published = stats.events_published,
            failures = stats.delivery_failures,
            "Demo round published"
        );
    }
}

/// Parse bind address from command line argument.
///
/// Accepts "localhost", "localhost:PORT", "IP" or "IP:PORT".
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 8080;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = ServerConfig::default();
    if let Some(arg) = args.get(1) {
        config = config.bind(parse_bind_addr(arg)?);
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("room_hub=debug".parse()?)
                .add_directive("room_server=debug".parse()?),
        )
        .init();

    println!("Starting room hub on {}", config.bind_addr);
    println!(
        "Subscribe: websocat ws://localhost:{}/subscribe/{}",
        config.bind_addr.port(),
        DEMO_ROOM
    );

    let server = HubServer::new(config, LoggingHandler);
    tokio::spawn(produce(server.hub().clone()));

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\nShutting down...");
        })
        .await?;

    Ok(())
}
