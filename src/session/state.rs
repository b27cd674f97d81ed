//! Subscriber state machine
//!
//! Tracks one subscriber from connection upgrade to teardown.

use std::time::Instant;

use crate::registry::{RoomId, SubscriberId};
use crate::stats::SubscriberStats;

/// Subscriber lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberPhase {
    /// Transport upgraded, not yet registered
    Connecting,
    /// Registered and receiving events
    Active,
    /// Cancellation fired; deregistering and releasing the transport
    Closing,
}

/// State of one subscriber
#[derive(Debug)]
pub struct SubscriberSession {
    /// Subscriber id
    pub id: SubscriberId,

    /// Room the subscriber listens to
    pub room: RoomId,

    /// Current phase
    pub phase: SubscriberPhase,

    /// When the session was created
    pub connected_at: Instant,

    /// When the session became active
    pub activated_at: Option<Instant>,

    /// Frames written to the transport
    pub frames_sent: u64,

    /// Bytes written to the transport
    pub bytes_sent: u64,
}

impl SubscriberSession {
    /// Create a session in the `Connecting` phase
    pub fn new(id: SubscriberId, room: RoomId) -> Self {
        Self {
            id,
            room,
            phase: SubscriberPhase::Connecting,
            connected_at: Instant::now(),
            activated_at: None,
            frames_sent: 0,
            bytes_sent: 0,
        }
    }

    /// Registration done
    pub fn activate(&mut self) {
        if self.phase == SubscriberPhase::Connecting {
            self.phase = SubscriberPhase::Active;
            self.activated_at = Some(Instant::now());
        }
    }

    /// Cancellation observed. Terminal.
    pub fn close(&mut self) {
        self.phase = SubscriberPhase::Closing;
    }

    /// Record a frame written to the transport
    pub fn record_sent(&mut self, bytes: usize) {
        self.frames_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    /// Whether the session is receiving events
    pub fn is_active(&self) -> bool {
        self.phase == SubscriberPhase::Active
    }

    /// Snapshot of the session statistics
    pub fn stats(&self) -> SubscriberStats {
        SubscriberStats {
            frames_sent: self.frames_sent,
            bytes_sent: self.bytes_sent,
            duration: self.connected_at.elapsed(),
        }
    }
}
