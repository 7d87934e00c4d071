//! Host-facing workload surface
//!
//! The embedding host owns its workload object outright; this crate only
//! ever borrows it. The host drives session construction and teardown by
//! raising the two signals on [`WorkloadSignals`]: "loaded" delivers the new
//! workload handle, "unloaded" carries no payload.

use std::sync::Arc;

use crate::error::Result;
use crate::signal::{Signal, SubscriptionId};

/// The host's workload object, as seen by sessions.
///
/// Sessions hold this only through a weak handle whose validity ends with
/// the session itself; implementations stay fully opaque beyond a display
/// name for logging and diagnostics.
pub trait Workload: Send + Sync {
    /// Display name used in logs.
    fn name(&self) -> &str;
}

/// The pair of lifecycle signals a host raises for its workload.
///
/// Both signals deliver synchronously, in subscription order, on the thread
/// that called the notify method. The host must never raise them
/// concurrently or reentrantly.
#[derive(Default)]
pub struct WorkloadSignals {
    loaded: Signal<Arc<dyn Workload>>,
    unloaded: Signal<()>,
}

impl WorkloadSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the "workload loaded" signal.
    pub fn subscribe_loaded<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<dyn Workload>) -> Result<()> + Send + Sync + 'static,
    {
        self.loaded.subscribe(callback)
    }

    /// Remove a "loaded" subscription. Returns whether an entry was removed.
    pub fn unsubscribe_loaded(&self, id: SubscriptionId) -> bool {
        self.loaded.unsubscribe(id)
    }

    /// Subscribe to the "workload unloaded" signal.
    pub fn subscribe_unloaded<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.unloaded.subscribe(move |_| callback())
    }

    /// Remove an "unloaded" subscription. Returns whether an entry was removed.
    pub fn unsubscribe_unloaded(&self, id: SubscriptionId) -> bool {
        self.unloaded.unsubscribe(id)
    }

    /// Raised by the host after a new workload has finished loading.
    ///
    /// A subscriber error propagates to the host and aborts the remaining
    /// notifications.
    pub fn notify_loaded(&self, workload: &Arc<dyn Workload>) -> Result<()> {
        self.loaded.emit(workload)
    }

    /// Raised by the host once its workload has been torn down.
    pub fn notify_unloaded(&self) -> Result<()> {
        self.unloaded.emit(&())
    }
}
