//! Subscriber sessions
//!
//! A session is one subscriber connection: its phase, counters and the
//! reason it ended.

pub mod context;
pub mod state;

pub use context::SubscriberContext;
pub use state::{SubscriberPhase, SubscriberSession};

use crate::registry::{RoomId, SubscriberId};
use crate::stats::SubscriberStats;

/// Why a subscriber's lifecycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The owning context was cancelled (server shutdown)
    Shutdown,
    /// Cancelled by the dispatcher after a failed delivery
    Evicted,
    /// The peer closed the connection
    PeerClosed,
    /// A transport write failed
    WriteFailed,
    /// A transport write did not finish within the write timeout
    WriteTimeout,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExitReason::Shutdown => "shutdown",
            ExitReason::Evicted => "evicted",
            ExitReason::PeerClosed => "peer closed",
            ExitReason::WriteFailed => "write failed",
            ExitReason::WriteTimeout => "write timeout",
        };
        f.write_str(s)
    }
}

/// Outcome of a finished subscriber lifecycle
#[derive(Debug, Clone)]
pub struct SubscriberExit {
    /// Subscriber id
    pub id: SubscriberId,
    /// Room the subscriber was registered under
    pub room: RoomId,
    /// Why it ended
    pub reason: ExitReason,
    /// Delivery statistics
    pub stats: SubscriberStats,
}
