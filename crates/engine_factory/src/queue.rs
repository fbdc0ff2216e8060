//! The pending-destruction queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use engine_component::Entity;

/// FIFO of entities waiting to be destroyed.
///
/// Like [`EntityGenerator`](engine_component::EntityGenerator), this is a
/// cheap cloneable handle: clones share one queue, and pushing is safe from
/// any thread. Draining belongs to the main thread.
#[derive(Debug, Clone, Default)]
pub struct DestructionQueue {
    pending: Arc<Mutex<VecDeque<Entity>>>,
}

impl DestructionQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `entity` for destruction.
    pub fn push(&self, entity: Entity) {
        self.lock().push_back(entity);
    }

    /// Take every entity queued so far, oldest first. Entities pushed after
    /// this call stay queued for the next drain.
    pub fn drain(&self) -> Vec<Entity> {
        self.lock().drain(..).collect()
    }

    /// Number of queued entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Entity>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
