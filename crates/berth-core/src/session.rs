//! Session aggregate bound to one host workload instance

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::manager::{Manager, ManagerRegistry};
use crate::workload::Workload;

/// Unique identifier for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created; factories and manager attach still in progress
    Loading,
    /// All managers attached; the session is current
    Loaded,
    /// Unloading broadcast in progress; managers still attached
    Unloading,
    /// Managers detached; the session is finished
    Unloaded,
}

/// The lifetime-scoped aggregate of extension managers tied to one host
/// workload instance.
///
/// A session never owns the workload: it keeps a weak handle whose validity
/// is scoped to the session's own life. The display name is cached at
/// construction and immutable from then on, so it stays readable even after
/// the host has dropped the workload.
pub struct Session {
    id: SessionId,
    name: String,
    started_at: DateTime<Utc>,
    state: Mutex<SessionState>,
    workload: Weak<dyn Workload>,
    managers: Mutex<ManagerRegistry>,
}

impl Session {
    pub(crate) fn new(workload: &Arc<dyn Workload>) -> Self {
        Self {
            id: SessionId::new(),
            name: workload.name().to_string(),
            started_at: Utc::now(),
            state: Mutex::new(SessionState::Loading),
            workload: Arc::downgrade(workload),
            managers: Mutex::new(ManagerRegistry::new()),
        }
    }

    /// Unique id of this session.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Display name, cached from the workload at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When this session was constructed.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        *self.state.lock() = state;
    }

    /// The host workload this session is bound to, if the host still holds it.
    pub fn workload(&self) -> Option<Arc<dyn Workload>> {
        self.workload.upgrade()
    }

    /// Append a manager to this session's registry.
    pub fn add_manager(&self, manager: Box<dyn Manager>) {
        self.managers.lock().add(manager);
    }

    /// Number of managers owned by this session.
    pub fn manager_count(&self) -> usize {
        self.managers.lock().len()
    }

    /// Whether a manager of concrete type `T` is registered.
    pub fn has_manager<T: Manager>(&self) -> bool {
        self.managers.lock().contains::<T>()
    }

    /// Run `f` against the registered manager of type `T`, if present.
    ///
    /// The registry stays locked for the duration of `f`; keep it short and
    /// do not touch this session's managers from inside.
    pub fn with_manager<T, R, F>(&self, f: F) -> Option<R>
    where
        T: Manager,
        F: FnOnce(&mut T) -> R,
    {
        self.managers.lock().get_mut::<T>().map(f)
    }

    /// Attach every manager in add order.
    pub(crate) fn attach(&self) -> Result<()> {
        let mut managers = self.managers.lock();
        debug!("Attaching {} managers for session {}", managers.len(), self.name);
        managers.attach_all()
    }

    /// Detach every manager, in add order like attach.
    pub(crate) fn detach(&self) -> Result<()> {
        let mut managers = self.managers.lock();
        debug!("Detaching {} managers for session {}", managers.len(), self.name);
        managers.detach_all()
    }
}
