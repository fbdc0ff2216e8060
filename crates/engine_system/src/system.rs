//! The [`System`] trait and system identity.
//!
//! A system owns every instance of one (or a few) component kinds and the
//! logic operating on them. The entity factory hands each system the
//! component records tagged with the [`DefType`]s it registered for.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use engine_component::{ComponentError, ComponentRecord, DefType, Entity};

use crate::registry::Registry;

/// Stable runtime identity of a system type.
///
/// Equality and hashing use only the [`TypeId`]; the name is kept for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct SystemId {
    type_id: TypeId,
    name: &'static str,
}

impl SystemId {
    /// The identity of system type `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The Rust type name of the system.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for SystemId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for SystemId {}

impl Hash for SystemId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A component-processing unit.
///
/// Every method has a default so a system only overrides what it needs. All
/// calls arrive on the main thread.
pub trait System: Any {
    /// Component schema tags this system materialises.
    fn def_types(&self) -> Vec<DefType> {
        Vec::new()
    }

    /// Systems that must be initialized before this one.
    fn dependencies(&self) -> Vec<SystemId> {
        Vec::new()
    }

    /// Cross-system setup, run once after every system has been registered.
    fn initialize(&mut self, _registry: &Registry) {}

    /// Materialise the component described by `record` for `entity`.
    ///
    /// # Errors
    ///
    /// Returns a [`ComponentError`] if the record cannot be applied. The
    /// entity is still created with its other components.
    fn create(&mut self, _entity: Entity, _record: &ComponentRecord<'_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called for each record after all of the entity's records were passed
    /// to [`System::create`].
    fn post_create_init(&mut self, _entity: Entity, _record: &ComponentRecord<'_>) {}

    /// Drop all component state keyed by `entity`.
    fn destroy(&mut self, _entity: Entity) {}
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct Physics;
    struct Audio;

    #[test]
    fn test_system_id_equality() {
        assert_eq!(SystemId::of::<Physics>(), SystemId::of::<Physics>());
        assert_ne!(SystemId::of::<Physics>(), SystemId::of::<Audio>());
    }

    #[test]
    fn test_system_id_hashes_by_type() {
        let set: HashSet<_> = [SystemId::of::<Physics>(), SystemId::of::<Physics>()].into();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_system_id_name() {
        assert!(SystemId::of::<Physics>().name().ends_with("Physics"));
        assert_eq!(SystemId::of::<Audio>().to_string(), SystemId::of::<Audio>().name());
    }
}
