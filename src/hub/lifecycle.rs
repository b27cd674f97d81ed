//! Subscriber connection lifecycle
//!
//! `Connecting -> Active -> Closing`. An active subscriber sleeps until a
//! frame is queued for it, its peer goes away, or its token is cancelled.

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::registry::{RoomId, SubscriberHandle};
use crate::session::{ExitReason, SubscriberExit, SubscriberSession};
use crate::transport::Transport;

use super::Hub;

enum Step {
    Cancelled,
    PeerClosed,
    Deliver(Bytes),
}

impl Hub {
    /// Run one subscriber until its connection ends
    ///
    /// Registers `transport` under `room` and writes every event published to
    /// that room until cancellation. Cancellation comes from `shutdown` (the
    /// owning context), from the dispatcher after a failed delivery, or from
    /// the transport itself (peer closed, write error, write timeout). The
    /// subscriber is deregistered and the transport closed before returning.
    pub async fn subscribe<T: Transport>(
        &self,
        room: RoomId,
        mut transport: T,
        shutdown: &CancellationToken,
    ) -> SubscriberExit {
        let id = self.next_subscriber_id();
        let cancel = shutdown.child_token();
        let (outbound_tx, mut outbound_rx) = mpsc::channel(self.config().outbound_capacity.max(1));
        let mut session = SubscriberSession::new(id, room.clone());

        self.registry()
            .register(&room, SubscriberHandle::new(id, outbound_tx, cancel.clone()));
        session.activate();
        self.metrics().subscriber_connected();

        tracing::info!(room = %room, subscriber = %id, "Subscriber registered");

        let write_timeout = self.config().write_timeout;

        let reason = loop {
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => Step::Cancelled,
                _ = transport.closed() => Step::PeerClosed,
                frame = outbound_rx.recv() => match frame {
                    Some(frame) => Step::Deliver(frame),
                    None => Step::Cancelled,
                },
            };

            match step {
                Step::Cancelled if shutdown.is_cancelled() => break ExitReason::Shutdown,
                Step::Cancelled => break ExitReason::Evicted,
                Step::PeerClosed => break ExitReason::PeerClosed,
                Step::Deliver(frame) => {
                    let len = frame.len();
                    let write = tokio::time::timeout(write_timeout, transport.send(frame));
                    let written = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => None,
                        result = write => Some(result),
                    };

                    match written {
                        None if shutdown.is_cancelled() => break ExitReason::Shutdown,
                        None => break ExitReason::Evicted,
                        Some(Ok(Ok(()))) => session.record_sent(len),
                        Some(Ok(Err(e))) => {
                            tracing::warn!(
                                room = %room,
                                subscriber = %id,
                                error = %e,
                                "Failed to write event to subscriber"
                            );
                            break ExitReason::WriteFailed;
                        }
                        Some(Err(_)) => {
                            tracing::warn!(
                                room = %room,
                                subscriber = %id,
                                timeout_ms = write_timeout.as_millis() as u64,
                                "Timed out writing event to subscriber"
                            );
                            break ExitReason::WriteTimeout;
                        }
                    }
                }
            }
        };

        cancel.cancel();
        session.close();
        self.registry().deregister(&room, id);
        outbound_rx.close();
        transport.close().await;
        self.metrics().subscriber_disconnected();

        let stats = session.stats();
        tracing::info!(
            room = %room,
            subscriber = %id,
            reason = %reason,
            frames_sent = stats.frames_sent,
            "Subscriber disconnected"
        );

        SubscriberExit {
            id,
            room,
            reason,
            stats,
        }
    }
}
