//! Subscriber handle types
//!
//! This module defines the per-subscriber state stored in the registry.

use std::fmt;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::DeliveryError;

/// Process-unique identifier of one subscriber connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry entry for a single subscriber
///
/// The transport itself stays with the subscriber's lifecycle task. The
/// registry only holds the sending half of the subscriber's outbound queue
/// and its cancellation token, both of which are cheap to clone.
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    id: SubscriberId,
    outbound: mpsc::Sender<Bytes>,
    cancel: CancellationToken,
}

impl SubscriberHandle {
    /// Create a handle from a queue sender and the subscriber's token
    pub fn new(id: SubscriberId, outbound: mpsc::Sender<Bytes>, cancel: CancellationToken) -> Self {
        Self {
            id,
            outbound,
            cancel,
        }
    }

    /// Subscriber id
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Queue a frame without waiting
    pub fn try_deliver(&self, frame: Bytes) -> Result<(), DeliveryError> {
        self.outbound.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Trigger this subscriber's cancellation. Safe to call repeatedly.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation has been triggered
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
