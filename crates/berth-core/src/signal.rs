//! Synchronous event dispatch
//!
//! A [`Signal`] is an explicit ordered list of subscriber callbacks with
//! manual subscribe/unsubscribe. Broadcasting is synchronous and happens in
//! registration order on the thread that raised the event; the first failing
//! subscriber aborts the remaining notifications and its error propagates to
//! the caller.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

/// Handle identifying one subscription on a [`Signal`].
///
/// Ids are allocated per signal and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Arc<dyn Fn(&T) -> Result<()> + Send + Sync>;

/// Ordered synchronous multicast of `&T` to subscriber callbacks.
pub struct Signal<T> {
    state: Mutex<SignalState<T>>,
}

struct SignalState<T> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    /// Create a signal with no subscribers.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SignalState {
                next_id: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Register a subscriber callback.
    ///
    /// Subscribers are notified in registration order.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscriber. Returns whether an entry was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(entry_id, _)| *entry_id != id);
        state.subscribers.len() != before
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// Whether no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.state.lock().subscribers.is_empty()
    }

    /// Notify every subscriber in registration order.
    ///
    /// The subscriber list is snapshotted up front, so subscribing or
    /// unsubscribing from inside a callback only affects later broadcasts.
    /// The first failing subscriber aborts the rest.
    pub(crate) fn emit(&self, value: &T) -> Result<()> {
        let snapshot: Vec<Callback<T>> = {
            let state = self.state.lock();
            state
                .subscribers
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };
        for callback in snapshot {
            callback(value)?;
        }
        Ok(())
    }
}
