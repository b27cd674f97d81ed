//! Statistics for the hub and its subscribers

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Per-subscriber statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberStats {
    /// Frames written to the transport
    pub frames_sent: u64,
    /// Bytes written to the transport
    pub bytes_sent: u64,
    /// Time since the subscriber connected
    pub duration: Duration,
}

/// Hub-wide statistics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubStats {
    /// Subscribers currently registered
    pub active_subscribers: u64,
    /// Subscribers ever registered
    pub total_subscribers: u64,
    /// Rooms with at least one subscriber
    pub rooms: u64,
    /// Calls to publish
    pub events_published: u64,
    /// Frames handed to subscriber queues
    pub frames_enqueued: u64,
    /// Deliveries that failed and cancelled a subscriber
    pub delivery_failures: u64,
}

/// Live hub counters
#[derive(Debug, Default)]
pub(crate) struct HubMetrics {
    active_subscribers: AtomicU64,
    total_subscribers: AtomicU64,
    events_published: AtomicU64,
    frames_enqueued: AtomicU64,
    delivery_failures: AtomicU64,
}

impl HubMetrics {
    pub(crate) fn subscriber_connected(&self) {
        self.active_subscribers.fetch_add(1, Ordering::Relaxed);
        self.total_subscribers.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn subscriber_disconnected(&self) {
        self.active_subscribers.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn event_published(&self, enqueued: u64, failed: u64) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        self.frames_enqueued.fetch_add(enqueued, Ordering::Relaxed);
        self.delivery_failures.fetch_add(failed, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, rooms: usize) -> HubStats {
        HubStats {
            active_subscribers: self.active_subscribers.load(Ordering::Relaxed),
            total_subscribers: self.total_subscribers.load(Ordering::Relaxed),
            rooms: rooms as u64,
            events_published: self.events_published.load(Ordering::Relaxed),
            frames_enqueued: self.frames_enqueued.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
        }
    }
}
