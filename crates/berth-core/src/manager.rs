//! Extension units attached to a session
//!
//! A [`Manager`] is the pluggable unit a factory builds for one session.
//! Its lifetime is bounded by the owning session: `attach` runs once while
//! the session comes up, `detach` once while it goes down, both sequenced
//! by the session's [`ManagerRegistry`].

use std::any::Any;

use crate::error::Result;

/// A pluggable extension unit with attach/detach lifecycle hooks.
///
/// Hooks are side-effect only: no arguments, no payload back. An error
/// returned from either hook propagates to whoever drove the transition and
/// leaves the owning session partially (de)attached; there is no retry and
/// no rollback.
pub trait Manager: Any + Send + Sync {
    /// Invoked once when the owning session attaches.
    fn attach(&mut self) -> Result<()>;

    /// Invoked once when the owning session detaches.
    fn detach(&mut self) -> Result<()>;
}

/// Insertion-ordered registry of the managers owned by one session.
#[derive(Default)]
pub struct ManagerRegistry {
    managers: Vec<Box<dyn Manager>>,
}

impl ManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a manager. Attach/detach sequencing follows insertion order.
    pub fn add(&mut self, manager: Box<dyn Manager>) {
        self.managers.push(manager);
    }

    /// Number of registered managers.
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    /// Whether no manager is registered.
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Whether a manager of concrete type `T` is registered.
    pub fn contains<T: Manager>(&self) -> bool {
        self.managers
            .iter()
            .any(|manager| (&**manager as &dyn Any).is::<T>())
    }

    /// Look up a manager by concrete type.
    pub fn get_mut<T: Manager>(&mut self) -> Option<&mut T> {
        self.managers
            .iter_mut()
            .find_map(|manager| (&mut **manager as &mut dyn Any).downcast_mut::<T>())
    }

    /// Attach every manager in add order; the first failure aborts the rest.
    pub(crate) fn attach_all(&mut self) -> Result<()> {
        for manager in &mut self.managers {
            manager.attach()?;
        }
        Ok(())
    }

    /// Detach every manager in add order, same as attach; units must not
    /// rely on reverse-order teardown. The first failure aborts the rest.
    pub(crate) fn detach_all(&mut self) -> Result<()> {
        for manager in &mut self.managers {
            manager.detach()?;
        }
        Ok(())
    }
}
