//! Manager factories and their identity-keyed registry

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::error::Result;
use crate::manager::Manager;
use crate::session::Session;

/// Factory callback type for building session managers.
///
/// Each registered factory is invoked once per session construction with the
/// freshly built session. `Ok(Some(manager))` adds the manager to the
/// session in visitation order, `Ok(None)` declines, and `Err` aborts the
/// whole load transition with the remaining factories unrun.
pub type ManagerFactory =
    Arc<dyn Fn(&Arc<Session>) -> Result<Option<Box<dyn Manager>>> + Send + Sync>;

/// Opaque identity of a factory callback: the allocation address, not value
/// equality. Clones of one `Arc` share a key; separately allocated but
/// otherwise identical closures do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FactoryKey(usize);

fn factory_key(factory: &ManagerFactory) -> FactoryKey {
    FactoryKey(Arc::as_ptr(factory) as *const () as usize)
}

/// Uniqueness-by-identity set of factory callbacks.
///
/// Iteration order is unspecified and may change between loads.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<FactoryKey, ManagerFactory>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Returns `false` if the same callback identity is
    /// already present (the existing registration is kept).
    pub fn add(&mut self, factory: ManagerFactory) -> bool {
        match self.factories.entry(factory_key(&factory)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(factory);
                true
            }
        }
    }

    /// Remove a factory. Returns whether an entry was removed.
    pub fn remove(&mut self, factory: &ManagerFactory) -> bool {
        self.factories.remove(&factory_key(factory)).is_some()
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Clone out the registered factories, in unspecified order.
    pub(crate) fn snapshot(&self) -> Vec<ManagerFactory> {
        self.factories.values().cloned().collect()
    }
}
