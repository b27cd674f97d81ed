//! Broadcast dispatcher
//!
//! Fans an event out to every subscriber of its room. The caller never waits
//! on a subscriber: each delivery is a non-blocking enqueue, and the write to
//! the transport happens later in the subscriber's own task.

use crate::event::RoomEvent;

use super::Hub;

impl Hub {
    /// Publish an event to the current subscribers of its room
    ///
    /// Fire-and-forget: returns as soon as the frame has been queued for every
    /// subscriber. A subscriber whose queue is full or closed is cancelled and
    /// will deregister itself; the remaining subscribers are unaffected and
    /// nothing is reported back to the caller. Subscribers already cancelled
    /// are skipped.
    ///
    /// Events published in sequence by one caller reach each subscriber in
    /// that order. Subscribers that register after this call takes the
    /// registry lock do not see the event.
    pub fn publish(&self, event: RoomEvent) {
        let frame = match event.payload.encode() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(
                    room = %event.room,
                    kind = %event.kind(),
                    error = %e,
                    "Failed to serialize event"
                );
                return;
            }
        };

        let mut enqueued = 0u64;
        let mut failed = 0u64;

        self.registry().for_each(&event.room, |handle| {
            // Already on its way out; its lifecycle will deregister it
            if handle.is_cancelled() {
                return;
            }

            match handle.try_deliver(frame.clone()) {
                Ok(()) => enqueued += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        room = %event.room,
                        subscriber = %handle.id(),
                        kind = %event.kind(),
                        error = %e,
                        "Failed to send event to subscriber"
                    );
                    handle.cancel();
                }
            }
        });

        self.metrics().event_published(enqueued, failed);

        tracing::trace!(
            room = %event.room,
            kind = %event.kind(),
            subscribers = enqueued,
            failed = failed,
            "Event published"
        );
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::event::EventPayload;
    use crate::hub::{Hub, HubConfig};
    use crate::registry::{RoomId, SubscriberHandle, SubscriberId};

    use super::*;

    fn register(
        hub: &Hub,
        room: &str,
        id: u64,
        capacity: usize,
    ) -> (mpsc::Receiver<Bytes>, CancellationToken) {
        let (tx, rx) = mpsc::channel(capacity);
        let token = CancellationToken::new();
        hub.registry().register(
            &RoomId::new(room),
            SubscriberHandle::new(SubscriberId(id), tx, token.clone()),
        );
        (rx, token)
    }

    #[tokio::test]
    async fn test_publish_reaches_room_only() {
        let hub = Hub::new();
        let (mut a, _) = register(&hub, "r1", 1, 4);
        let (mut b, _) = register(&hub, "r1", 2, 4);
        let (mut c, _) = register(&hub, "r2", 3, 4);

        hub.publish(RoomEvent::message_created("r1", "m1", "hi"));

        let expected = r#"{"kind":"message_created","value":{"id":"m1","message":"hi"}}"#;
        assert_eq!(a.recv().await.unwrap(), expected.as_bytes());
        assert_eq!(b.recv().await.unwrap(), expected.as_bytes());
        assert!(c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_to_empty_room_is_noop() {
        let hub = Hub::new();
        hub.publish(RoomEvent::message_answered("nobody-here", "m1"));

        let stats = hub.stats();
        assert_eq!(stats.events_published, 1);
        assert_eq!(stats.frames_enqueued, 0);
        assert_eq!(hub.registry().room_count(), 0);
    }

    #[tokio::test]
    async fn test_closed_subscriber_cancelled_others_delivered() {
        let hub = Hub::new();
        let (broken, broken_token) = register(&hub, "r1", 1, 4);
        let (mut healthy, healthy_token) = register(&hub, "r1", 2, 4);
        drop(broken);

        hub.publish(RoomEvent::message_reaction_increased("r1", "m1", 5));

        assert!(broken_token.is_cancelled());
        assert!(!healthy_token.is_cancelled());
        let frame = healthy.recv().await.unwrap();
        assert_eq!(
            EventPayload::decode(&frame).unwrap(),
            EventPayload::MessageReactionIncreased {
                id: "m1".into(),
                count: 5
            }
        );

        // Removal is left to the subscriber's lifecycle
        assert_eq!(hub.subscriber_count(&RoomId::new("r1")), 2);
        assert_eq!(hub.stats().delivery_failures, 1);
    }

    #[tokio::test]
    async fn test_full_queue_cancels_slow_subscriber() {
        let hub = Hub::with_config(HubConfig::default().outbound_capacity(1));
        let (mut slow, slow_token) = register(&hub, "r1", 1, 1);

        hub.publish(RoomEvent::message_answered("r1", "m1"));
        assert!(!slow_token.is_cancelled());

        hub.publish(RoomEvent::message_answered("r1", "m2"));
        assert!(slow_token.is_cancelled());

        // The frame queued before the overflow is still there
        let frame = slow.recv().await.unwrap();
        assert_eq!(EventPayload::decode(&frame).unwrap().id(), "m1");
    }

    #[tokio::test]
    async fn test_cancelled_subscriber_skipped() {
        let hub = Hub::new();
        let (mut gone, gone_token) = register(&hub, "r1", 1, 4);
        let (mut live, _) = register(&hub, "r1", 2, 4);
        gone_token.cancel();

        hub.publish(RoomEvent::message_answered("r1", "m1"));
        hub.publish(RoomEvent::message_answered("r1", "m2"));

        assert!(gone.try_recv().is_err());
        assert_eq!(EventPayload::decode(&live.recv().await.unwrap()).unwrap().id(), "m1");

        let stats = hub.stats();
        assert_eq!(stats.frames_enqueued, 2);
        assert_eq!(stats.delivery_failures, 0);
    }

    #[tokio::test]
    async fn test_cancelled_full_queue_not_counted_as_failure() {
        let hub = Hub::new();
        let (rx, token) = register(&hub, "r1", 1, 1);

        hub.publish(RoomEvent::message_answered("r1", "m1"));
        hub.publish(RoomEvent::message_answered("r1", "m2"));
        assert!(token.is_cancelled());
        assert_eq!(hub.stats().delivery_failures, 1);

        // Further publishes leave the evicted subscriber alone
        hub.publish(RoomEvent::message_answered("r1", "m3"));
        hub.publish(RoomEvent::message_answered("r1", "m4"));

        let stats = hub.stats();
        assert_eq!(stats.delivery_failures, 1);
        assert_eq!(stats.frames_enqueued, 1);
        drop(rx);
    }

    #[tokio::test]
    async fn test_events_keep_publish_order() {
        let hub = Hub::new();
        let (mut rx, _) = register(&hub, "r1", 1, 16);

        for count in 1..=10 {
            hub.publish(RoomEvent::message_reaction_increased("r1", "m1", count));
        }

        for count in 1..=10 {
            let frame = rx.recv().await.unwrap();
            assert_eq!(
                EventPayload::decode(&frame).unwrap(),
                EventPayload::MessageReactionIncreased {
                    id: "m1".into(),
                    count
                }
            );
        }
    }
}
