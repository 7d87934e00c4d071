//! Session lifecycle orchestration
//!
//! [`SessionLifecycle`] bridges the host's workload signals to session
//! construction and teardown. On "loaded" it builds a session, runs every
//! registered factory against it, attaches the managers in add order, makes
//! the session current, and broadcasts `session_loaded`. On "unloaded" it
//! broadcasts `session_unloading` while the session is still live, then
//! detaches the managers and clears the current slot.
//!
//! Every transition runs synchronously on the thread that raised the host
//! signal; the host must not raise its signals concurrently or reentrantly.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::error::Result;
use crate::factory::{FactoryRegistry, ManagerFactory};
use crate::session::{Session, SessionState};
use crate::signal::{Signal, SubscriptionId};
use crate::workload::{Workload, WorkloadSignals};

/// One `attach` worth of host signal subscriptions.
struct HostBinding {
    signals: Weak<WorkloadSignals>,
    loaded: SubscriptionId,
    unloaded: SubscriptionId,
}

#[derive(Default)]
struct LifecycleState {
    current: Option<Arc<Session>>,
    factories: FactoryRegistry,
}

/// Manages the creation and destruction of [`Session`] instances for each
/// workload the host loads.
///
/// A lifecycle owns at most one current session at a time, together with the
/// registry of factories that populate new sessions with managers. State is
/// per instance, so independent lifecycles can be bound to independent
/// hosts in one process.
pub struct SessionLifecycle {
    /// Back reference handed to host signal handlers, so an abandoned
    /// lifecycle is not kept alive by the host's subscriber list.
    weak_self: Weak<SessionLifecycle>,
    state: Mutex<LifecycleState>,
    bindings: Mutex<Vec<HostBinding>>,
    session_loaded: Signal<Arc<Session>>,
    session_unloading: Signal<Arc<Session>>,
}

impl SessionLifecycle {
    /// Create a lifecycle with no factories and no host binding.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            state: Mutex::new(LifecycleState::default()),
            bindings: Mutex::new(Vec::new()),
            session_loaded: Signal::new(),
            session_unloading: Signal::new(),
        })
    }

    /// Register a factory to run on every subsequent load.
    ///
    /// Returns `false` if the same callback identity is already registered.
    pub fn add_factory(&self, factory: ManagerFactory) -> bool {
        self.state.lock().factories.add(factory)
    }

    /// Remove a registered factory. Returns whether an entry was removed.
    pub fn remove_factory(&self, factory: &ManagerFactory) -> bool {
        self.state.lock().factories.remove(factory)
    }

    /// The active session, if a workload is currently loaded.
    pub fn current_session(&self) -> Option<Arc<Session>> {
        self.state.lock().current.clone()
    }

    /// Broadcast after a new session is fully attached and current.
    pub fn session_loaded(&self) -> &Signal<Arc<Session>> {
        &self.session_loaded
    }

    /// Broadcast before a session's managers detach on an explicit unload.
    ///
    /// Subscribers receive the still-live session and may read its state.
    /// The override and [`detach`](Self::detach) paths skip this broadcast.
    pub fn session_unloading(&self) -> &Signal<Arc<Session>> {
        &self.session_unloading
    }

    /// Subscribe to the host's two lifecycle signals.
    ///
    /// Must be called exactly once per binding and paired with
    /// [`detach`](Self::detach): a second call registers a second set of
    /// handlers, and every host notification is then processed twice.
    pub fn attach(&self, signals: &Arc<WorkloadSignals>) {
        let lifecycle = self.weak_self.clone();
        let loaded = signals.subscribe_loaded(move |workload| match lifecycle.upgrade() {
            Some(lifecycle) => lifecycle.handle_loaded(workload),
            None => Ok(()),
        });

        let lifecycle = self.weak_self.clone();
        let unloaded = signals.subscribe_unloaded(move || match lifecycle.upgrade() {
            Some(lifecycle) => lifecycle.handle_unloaded(),
            None => Ok(()),
        });

        self.bindings.lock().push(HostBinding {
            signals: Arc::downgrade(signals),
            loaded,
            unloaded,
        });
    }

    /// Drop the current session without raising `session_unloading`, then
    /// unsubscribe from every host signal taken by `attach`.
    ///
    /// Safe to call with no active session. A failing manager detach
    /// propagates before the host subscriptions are released, leaving the
    /// binding in place.
    pub fn detach(&self) -> Result<()> {
        self.force_detach_current()?;
        for binding in self.bindings.lock().drain(..) {
            if let Some(signals) = binding.signals.upgrade() {
                signals.unsubscribe_loaded(binding.loaded);
                signals.unsubscribe_unloaded(binding.unloaded);
            }
        }
        Ok(())
    }

    /// Detach and clear the current session, skipping the unloading
    /// broadcast. No-op without a session.
    fn force_detach_current(&self) -> Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };
        session.detach()?;
        session.set_state(SessionState::Unloaded);
        self.state.lock().current = None;
        Ok(())
    }

    /// Host signal: a new workload finished loading.
    fn handle_loaded(&self, workload: &Arc<dyn Workload>) -> Result<()> {
        let (previous, factories) = {
            let state = self.state.lock();
            (state.current.clone(), state.factories.snapshot())
        };

        // A load with a session still active overrides it: the old managers
        // detach in add order, and session_unloading is NOT broadcast on
        // this path. Only an explicit unloaded signal raises it.
        if let Some(previous) = previous {
            warn!("Overriding active session {}", previous.name());
            previous.detach()?;
            previous.set_state(SessionState::Unloaded);
        }

        info!("Starting new session for {}", workload.name());
        let session = Arc::new(Session::new(workload));
        for factory in factories {
            if let Some(manager) = factory(&session)? {
                session.add_manager(manager);
            }
        }
        session.attach()?;
        session.set_state(SessionState::Loaded);
        self.state.lock().current = Some(Arc::clone(&session));
        self.session_loaded.emit(&session)?;
        Ok(())
    }

    /// Host signal: the current workload was torn down.
    fn handle_unloaded(&self) -> Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        session.set_state(SessionState::Unloading);
        self.session_unloading.emit(&session)?;
        info!("Unloading session for {}", session.name());
        session.detach()?;
        session.set_state(SessionState::Unloaded);
        self.state.lock().current = None;
        Ok(())
    }
}
