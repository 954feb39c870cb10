//! In-process change notification bus
//!
//! Synchronous publish/subscribe of "version updated" events keyed by
//! nid. The identity registry subscribes and re-ingests on notification;
//! external writers publish after writing to the backing store.
//!
//! Delivery is synchronous on the publisher's thread (the apply
//! context). Subscribers must not subscribe from inside a callback — the
//! bus makes no reentrancy guarantees.

use glossa_core::{BusCallback, ChangeBus, Nid};
use parking_lot::RwLock;

/// Synchronous in-process [`ChangeBus`]
pub struct ChannelBus {
    subscribers: RwLock<Vec<BusCallback>>,
}

impl ChannelBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        ChannelBus {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for ChannelBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus for ChannelBus {
    fn publish(&self, nid: Nid) {
        let subscribers = self.subscribers.read();
        for subscriber in subscribers.iter() {
            subscriber(nid);
        }
    }

    fn subscribe(&self, callback: BusCallback) {
        self.subscribers.write().push(callback);
    }
}

impl std::fmt::Debug for ChannelBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
