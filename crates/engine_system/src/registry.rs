//! Registry — the container that owns systems and looks them up by type.
//!
//! Systems live here as `Rc<RefCell<T>>`. The entity factory and other
//! systems hold clones of those handles; the registry keeps ownership for the
//! lifetime of the application. Like the systems it holds, the registry is
//! main-thread only.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::error::SystemError;
use crate::system::SystemId;

/// Type-keyed container of shared system instances.
#[derive(Default)]
pub struct Registry {
    entries: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Take ownership of `value` and return a shared handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::AlreadyRegistered`] if an instance of `T` is
    /// already registered.
    pub fn create<T: Any>(&self, value: T) -> Result<Rc<RefCell<T>>, SystemError> {
        let mut entries = self.entries.borrow_mut();
        let id = SystemId::of::<T>();
        if entries.contains_key(&id.type_id()) {
            return Err(SystemError::AlreadyRegistered(id));
        }

        let handle = Rc::new(RefCell::new(value));
        entries.insert(id.type_id(), handle.clone() as Rc<dyn Any>);
        debug!(system = %id, "registered instance");
        Ok(handle)
    }

    /// The registered instance of `T`, if any.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<Rc<RefCell<T>>> {
        let entry = self.entries.borrow().get(&TypeId::of::<T>())?.clone();
        entry.downcast::<RefCell<T>>().ok()
    }

    /// Whether an instance of `T` is registered.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.borrow().contains_key(&TypeId::of::<T>())
    }

    /// Number of registered instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    #[derive(Debug)]
    struct Other;

    #[test]
    fn test_create_and_get_share_instance() {
        let registry = Registry::new();
        let created = registry.create(Counter(1)).unwrap();
        created.borrow_mut().0 = 7;

        let fetched = registry.get::<Counter>().unwrap();
        assert_eq!(*fetched.borrow(), Counter(7));
        assert!(Rc::ptr_eq(&created, &fetched));
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let registry = Registry::new();
        registry.create(Counter(1)).unwrap();
        assert!(matches!(
            registry.create(Counter(2)),
            Err(SystemError::AlreadyRegistered(id)) if id == SystemId::of::<Counter>()
        ));
        assert_eq!(registry.get::<Counter>().unwrap().borrow().0, 1);
    }

    #[test]
    fn test_missing_type() {
        let registry = Registry::new();
        registry.create(Counter(1)).unwrap();
        assert!(registry.get::<Other>().is_none());
        assert!(!registry.contains::<Other>());
        assert!(registry.contains::<Counter>());
        assert_eq!(registry.len(), 1);
    }
}
