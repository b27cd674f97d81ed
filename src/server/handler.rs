//! Subscribe handler hooks
//!
//! The hub itself does not know which rooms exist. A [`SubscribeHandler`]
//! lets the embedding service check the room against its own store before a
//! connection is registered, and observe when it ends.

use std::future::Future;

use crate::session::{SubscriberContext, SubscriberExit};

/// Hooks invoked around each subscriber connection
pub trait SubscribeHandler: Send + Sync + 'static {
    /// Decide whether the upgraded connection may subscribe to `ctx.room`
    ///
    /// Returning `false` closes the connection with close code 4004 and
    /// nothing is registered.
    fn on_subscribe(&self, _ctx: &SubscriberContext) -> impl Future<Output = bool> + Send {
        async { true }
    }

    /// Called after the subscriber has been deregistered
    fn on_unsubscribe(
        &self,
        _ctx: &SubscriberContext,
        _exit: &SubscriberExit,
    ) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Handler that accepts every room
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SubscribeHandler for AcceptAll {}
