//! Entity handles and thread-safe id generation.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! Systems use it as a key for whatever component state they own.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// Entities are pure identifiers and carry no data of their own. The value
/// `0` is reserved for [`Entity::INVALID`] and is never handed out by an
/// [`EntityGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The "no entity" sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is not the [`Entity::INVALID`] sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Issues process-unique, monotonically increasing entity ids.
///
/// The generator is a cheap handle around a mutex-guarded counter. Clones
/// share the same counter, so a clone can be moved to another thread and keep
/// issuing ids that never collide with the ones issued on the main thread.
#[derive(Debug, Clone)]
pub struct EntityGenerator {
    next_id: Arc<Mutex<u64>>,
}

impl EntityGenerator {
    /// Creates a new generator. Ids start at 1 (0 is [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Issues a fresh entity id. Safe to call from any thread.
    pub fn generate(&self) -> Entity {
        let mut next = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
        let entity = Entity(*next);
        *next += 1;
        entity
    }

    /// Returns the number of entities issued so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        *self.next_id.lock().unwrap_or_else(PoisonError::into_inner) - 1
    }
}

impl Default for EntityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use super::*;

    #[test]
    fn test_entity_creation() {
        let e = Entity::from_raw(42);
        assert_eq!(e.id(), 42);
        assert!(e.is_valid());
    }

    #[test]
    fn test_entity_invalid() {
        assert!(!Entity::INVALID.is_valid());
        assert_eq!(Entity::INVALID.id(), 0);
    }

    #[test]
    fn test_generator_starts_after_sentinel() {
        let generator = EntityGenerator::new();
        assert_eq!(generator.generate(), Entity(1));
        assert_eq!(generator.generate(), Entity(2));
        assert_eq!(generator.count(), 2);
    }

    #[test]
    fn test_clones_share_counter() {
        let generator = EntityGenerator::new();
        let clone = generator.clone();
        let a = generator.generate();
        let b = clone.generate();
        assert_ne!(a, b);
        assert_eq!(generator.count(), 2);
    }

    #[test]
    fn test_concurrent_generation_is_unique() {
        let generator = EntityGenerator::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                thread::spawn(move || (0..250).map(|_| generator.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for entity in handle.join().unwrap() {
                assert!(entity.is_valid());
                assert!(seen.insert(entity), "duplicate id {entity}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_entity_serialization_roundtrip() {
        let entity = Entity::from_raw(999);
        let bytes = rmp_serde::to_vec(&entity).unwrap();
        let restored: Entity = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(entity, restored);
    }
}
