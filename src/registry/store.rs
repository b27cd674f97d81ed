//! Subscriber registry implementation
//!
//! The central map from room to the subscribers currently connected to it.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::room::RoomId;
use super::subscriber::{SubscriberHandle, SubscriberId};

type Rooms = HashMap<RoomId, HashMap<SubscriberId, SubscriberHandle>>;

/// Registry of connected subscribers, keyed by room
///
/// A single mutex guards the whole map. Broadcast iteration takes the same
/// exclusive lock as registration so neither side can observe a torn view.
/// Every operation under the lock is non-blocking, so the lock is never held
/// across a transport write.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    rooms: Mutex<Rooms>,
}

impl SubscriberRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Rooms> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a subscriber under a room
    ///
    /// The room entry is created on first use.
    pub fn register(&self, room: &RoomId, handle: SubscriberHandle) {
        let mut rooms = self.lock();
        let subscribers = rooms.entry(room.clone()).or_default();
        subscribers.insert(handle.id(), handle);

        tracing::debug!(
            room = %room,
            subscribers = subscribers.len(),
            "Subscriber added to room"
        );
    }

    /// Remove a subscriber from a room
    ///
    /// Returns `false` if it was not registered. The room entry is dropped
    /// once its last subscriber leaves.
    pub fn deregister(&self, room: &RoomId, id: SubscriberId) -> bool {
        let mut rooms = self.lock();

        let Some(subscribers) = rooms.get_mut(room) else {
            return false;
        };
        let removed = subscribers.remove(&id).is_some();
        let remaining = subscribers.len();

        if remaining == 0 {
            rooms.remove(room);
        }

        if removed {
            tracing::debug!(
                room = %room,
                subscriber = %id,
                subscribers = remaining,
                "Subscriber removed from room"
            );
        }

        removed
    }

    /// Visit every subscriber of a room while holding the lock
    ///
    /// Order is unspecified. Does nothing for an unknown room. The callback
    /// must not call back into the registry.
    pub fn for_each<F>(&self, room: &RoomId, mut f: F)
    where
        F: FnMut(&SubscriberHandle),
    {
        let rooms = self.lock();

        if let Some(subscribers) = rooms.get(room) {
            for handle in subscribers.values() {
                f(handle);
            }
        }
    }

    /// Whether a subscriber is registered under a room
    pub fn contains(&self, room: &RoomId, id: SubscriberId) -> bool {
        self.lock()
            .get(room)
            .is_some_and(|subscribers| subscribers.contains_key(&id))
    }

    /// Number of subscribers in a room
    pub fn subscriber_count(&self, room: &RoomId) -> usize {
        self.lock().get(room).map_or(0, HashMap::len)
    }

    /// Number of rooms with at least one subscriber
    pub fn room_count(&self) -> usize {
        self.lock().len()
    }

    /// Number of subscribers across all rooms
    pub fn total_subscribers(&self) -> usize {
        self.lock().values().map(HashMap::len).sum()
    }
}
