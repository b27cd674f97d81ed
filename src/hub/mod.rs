//! Room-scoped broadcast hub
//!
//! A [`Hub`] owns the subscriber registry and is shared (by cloning) between
//! connection handlers, which call [`Hub::subscribe`], and event producers,
//! which call [`Hub::publish`]. Independent hubs share nothing.
//!
//! ```text
//!  producer ──publish──► dispatcher ──try_send──► [queue] ──► subscriber task ──► transport
//!                             │                                     ▲
//!                             └── on failure: cancel ───────────────┘
//!                                                   (task deregisters itself)
//! ```

pub mod config;
mod dispatcher;
mod lifecycle;

pub use config::HubConfig;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::registry::{RoomId, SubscriberId, SubscriberRegistry};
use crate::stats::{HubMetrics, HubStats};

struct HubInner {
    registry: SubscriberRegistry,
    config: HubConfig,
    metrics: HubMetrics,
    next_subscriber_id: AtomicU64,
}

/// Handle to a broadcast hub
///
/// Cheap to clone; all clones refer to the same registry.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl Hub {
    /// Create a hub with default configuration
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with custom configuration
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                registry: SubscriberRegistry::new(),
                config,
                metrics: HubMetrics::default(),
                next_subscriber_id: AtomicU64::new(1),
            }),
        }
    }

    /// Hub configuration
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// The subscriber registry
    pub fn registry(&self) -> &SubscriberRegistry {
        &self.inner.registry
    }

    /// Number of subscribers currently registered for a room
    pub fn subscriber_count(&self, room: &RoomId) -> usize {
        self.inner.registry.subscriber_count(room)
    }

    /// Statistics snapshot
    pub fn stats(&self) -> HubStats {
        self.inner.metrics.snapshot(self.inner.registry.room_count())
    }

    fn next_subscriber_id(&self) -> SubscriberId {
        SubscriberId(self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed))
    }

    fn metrics(&self) -> &HubMetrics {
        &self.inner.metrics
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("config", &self.inner.config)
            .field("rooms", &self.inner.registry.room_count())
            .field("subscribers", &self.inner.registry.total_subscribers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::event::{EventPayload, RoomEvent};
    use crate::session::ExitReason;
    use crate::transport::{ChannelPeer, ChannelTransport};

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn wait_for_subscribers(hub: &Hub, room: &RoomId, expected: usize) {
        tokio::time::timeout(TIMEOUT, async {
            while hub.subscriber_count(room) != expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("subscriber count never reached expected value");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_subscribe_publish_unsubscribe() {
        const SUBSCRIBERS: usize = 40;
        const EVENTS: usize = 50;

        let hub = Hub::with_config(HubConfig::default().outbound_capacity(EVENTS * 2));
        let room = RoomId::new("r1");

        let mut tokens = Vec::new();
        let mut tasks = Vec::new();
        let mut peers: Vec<ChannelPeer> = Vec::new();

        for _ in 0..SUBSCRIBERS {
            let (transport, peer) = ChannelTransport::pair();
            let token = CancellationToken::new();
            let hub = hub.clone();
            let room = room.clone();
            let owner = token.clone();
            tasks.push(tokio::spawn(async move {
                hub.subscribe(room, transport, &owner).await
            }));
            tokens.push(token);
            peers.push(peer);
        }

        wait_for_subscribers(&hub, &room, SUBSCRIBERS).await;

        // Tear down every other subscriber while publishing
        let publishers: Vec<_> = (0..EVENTS)
            .map(|i| {
                let hub = hub.clone();
                let room = room.clone();
                tokio::spawn(async move {
                    hub.publish(RoomEvent::message_created(room, format!("m{i}"), "hi"));
                })
            })
            .collect();

        for token in tokens.iter().step_by(2) {
            token.cancel();
        }

        for publisher in publishers {
            publisher.await.unwrap();
        }

        let mut kept = Vec::new();
        for (i, task) in tasks.into_iter().enumerate() {
            if i % 2 == 0 {
                let exit = tokio::time::timeout(TIMEOUT, task).await.unwrap().unwrap();
                assert_eq!(exit.reason, ExitReason::Shutdown);
            } else {
                kept.push(task);
            }
        }

        assert_eq!(hub.subscriber_count(&room), SUBSCRIBERS / 2);
        assert_eq!(hub.registry().total_subscribers(), SUBSCRIBERS / 2);

        // Surviving subscribers got every event
        for peer in peers.iter_mut().skip(1).step_by(2) {
            for _ in 0..EVENTS {
                let payload = tokio::time::timeout(TIMEOUT, peer.recv_event())
                    .await
                    .unwrap()
                    .unwrap();
                assert!(matches!(payload, EventPayload::MessageCreated { .. }));
            }
        }

        for token in &tokens {
            token.cancel();
        }
        for task in kept {
            tokio::time::timeout(TIMEOUT, task).await.unwrap().unwrap();
        }
        assert_eq!(hub.subscriber_count(&room), 0);
        assert_eq!(hub.stats().active_subscribers, 0);
        assert_eq!(hub.stats().total_subscribers, SUBSCRIBERS as u64);
    }

    #[test]
    fn test_independent_hubs() {
        let a = Hub::new();
        let b = Hub::new();
        let (tx, _rx) = tokio::sync::mpsc::channel(1);
        let room = RoomId::new("r1");

        a.registry().register(
            &room,
            crate::registry::SubscriberHandle::new(SubscriberId(1), tx, CancellationToken::new()),
        );

        assert_eq!(a.subscriber_count(&room), 1);
        assert_eq!(b.subscriber_count(&room), 0);
        assert_eq!(a.clone().subscriber_count(&room), 1);
    }

    #[test]
    fn test_subscriber_ids_unique() {
        let hub = Hub::new();
        let first = hub.next_subscriber_id();
        let second = hub.clone().next_subscriber_id();
        assert_ne!(first, second);
    }
}
