//! Typed change notifications.
//!
//! [`Signal`] is a synchronous observer list: [`Signal::emit`] calls every
//! connected handler in connection order before returning. [`Signal::connect`]
//! hands back a [`Subscription`]; dropping it disconnects the handler.
//!
//! The slot list is cloned before handlers run, so a handler may connect,
//! disconnect or emit on other signals without deadlocking. No lock is held
//! while a handler executes.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type Slot<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Slots<T> {
    next_id: u64,
    entries: Vec<(u64, Slot<T>)>,
}

/// Broadcast point for values of type `T`.
pub struct Signal<T> {
    slots: Arc<Mutex<Slots<T>>>,
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Connects a handler. It stays connected until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription disconnects the handler"]
    pub fn connect<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut slots = self.slots.lock();
            let id = slots.next_id;
            slots.next_id += 1;
            let slot: Slot<T> = Arc::new(handler);
            slots.entries.push((id, slot));
            id
        };

        let weak: Weak<Mutex<Slots<T>>> = Arc::downgrade(&self.slots);
        Subscription {
            disconnect: Some(Box::new(move || {
                if let Some(slots) = weak.upgrade() {
                    slots.lock().entries.retain(|(slot_id, _)| *slot_id != id);
                }
            })),
        }
    }

    /// Calls every connected handler with `value`.
    pub fn emit(&self, value: &T) {
        let handlers: Vec<Slot<T>> = self
            .slots
            .lock()
            .entries
            .iter()
            .map(|(_, slot)| Arc::clone(slot))
            .collect();

        for handler in handlers {
            handler(value);
        }
    }

    /// Number of connected handlers
    pub fn subscriber_count(&self) -> usize {
        self.slots.lock().entries.len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

/// Unsubscribe token returned by [`Signal::connect`].
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Disconnects the handler now.
    pub fn unsubscribe(mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("connected", &self.disconnect.is_some())
            .finish()
    }
}
