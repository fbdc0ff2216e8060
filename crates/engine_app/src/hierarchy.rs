//! Parent/child links between entities spawned from blueprint trees.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use engine_component::{BlueprintTree, Entity};
use engine_factory::{CreateChildFn, DestructionQueue, EntityFactory};
use engine_system::System;
use tracing::debug;

/// Tracks which entity each child belongs to. Destroying a parent queues its
/// children for destruction.
#[derive(Debug)]
pub struct HierarchySystem {
    parents: HashMap<Entity, Entity>,
    children: HashMap<Entity, Vec<Entity>>,
    pending_destroy: DestructionQueue,
}

impl HierarchySystem {
    #[must_use]
    pub fn new(pending_destroy: DestructionQueue) -> Self {
        Self {
            parents: HashMap::new(),
            children: HashMap::new(),
            pending_destroy,
        }
    }

    pub fn attach(&mut self, parent: Entity, child: Entity) {
        self.parents.insert(child, parent);
        self.children.entry(parent).or_default().push(child);
    }

    #[must_use]
    pub fn parent_of(&self, child: Entity) -> Option<Entity> {
        self.parents.get(&child).copied()
    }

    #[must_use]
    pub fn children_of(&self, parent: Entity) -> &[Entity] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl System for HierarchySystem {
    fn destroy(&mut self, entity: Entity) {
        if let Some(parent) = self.parents.remove(&entity)
            && let Some(siblings) = self.children.get_mut(&parent)
        {
            siblings.retain(|&sibling| sibling != entity);
        }
        for child in self.children.remove(&entity).unwrap_or_default() {
            self.parents.remove(&child);
            self.pending_destroy.push(child);
        }
    }
}

/// Creates each child subtree and attaches it to its parent.
pub struct AttachToParent {
    hierarchy: Rc<RefCell<HierarchySystem>>,
}

impl AttachToParent {
    #[must_use]
    pub fn new(hierarchy: Rc<RefCell<HierarchySystem>>) -> Self {
        Self { hierarchy }
    }
}

impl CreateChildFn for AttachToParent {
    fn create_child(&self, factory: &mut EntityFactory, parent: Entity, child: &BlueprintTree<'_>) -> Entity {
        let entity = factory.create_with_tree(child);
        if entity.is_valid() {
            self.hierarchy.borrow_mut().attach(parent, entity);
            debug!(%parent, child = %entity, "attached child");
        }
        entity
    }
}

#[cfg(test)]
mod tests {
    use engine_component::Blueprint;
    use engine_system::Registry;

    use super::*;

    fn factory() -> (EntityFactory, Rc<RefCell<HierarchySystem>>) {
        let mut factory = EntityFactory::new(Rc::new(Registry::new()));
        let hierarchy = factory
            .create_system(HierarchySystem::new(factory.destruction_queue()))
            .unwrap();
        factory.initialize().unwrap();
        factory.set_create_child_fn(Rc::new(AttachToParent::new(Rc::clone(&hierarchy))));
        (factory, hierarchy)
    }

    fn tree() -> BlueprintTree<'static> {
        BlueprintTree::leaf(Blueprint::new())
            .with_child(BlueprintTree::leaf(Blueprint::new()).with_child(BlueprintTree::leaf(Blueprint::new())))
            .with_child(BlueprintTree::leaf(Blueprint::new()))
    }

    #[test]
    fn test_children_attached_to_parent() {
        let (mut factory, hierarchy) = factory();
        let root = factory.create_with_tree(&tree());

        let hierarchy = hierarchy.borrow();
        let children = hierarchy.children_of(root);
        assert_eq!(children.len(), 2);
        assert_eq!(hierarchy.parent_of(children[0]), Some(root));
        assert_eq!(hierarchy.children_of(children[0]).len(), 1);
        assert!(hierarchy.children_of(children[1]).is_empty());
        assert_eq!(hierarchy.parent_of(root), None);
    }

    #[test]
    fn test_destroying_parent_cascades() {
        let (mut factory, hierarchy) = factory();
        let root = factory.create_with_tree(&tree());
        let first = hierarchy.borrow().children_of(root)[0];
        let grandchild = hierarchy.borrow().children_of(first)[0];

        factory.queue_for_destruction(root);
        let queue = factory.destruction_queue();
        let mut rounds = 0;
        while !queue.is_empty() {
            factory.destroy_queued_entities();
            rounds += 1;
        }

        assert_eq!(rounds, 3);
        let hierarchy = hierarchy.borrow();
        assert!(hierarchy.children_of(root).is_empty());
        assert_eq!(hierarchy.parent_of(grandchild), None);
        assert!(hierarchy.parents.is_empty());
    }

    #[test]
    fn test_destroying_child_detaches_it() {
        let (mut factory, hierarchy) = factory();
        let root = factory.create_with_tree(&tree());
        let second = hierarchy.borrow().children_of(root)[1];

        factory.destroy(second);
        assert_eq!(hierarchy.borrow().children_of(root).len(), 1);
        assert!(factory.destruction_queue().is_empty());
    }
}
