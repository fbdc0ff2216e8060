//! The hook that turns child blueprint subtrees into entities.

use engine_component::{BlueprintTree, Entity};

use crate::factory::EntityFactory;

/// Creates the entity for one child subtree of a blueprint tree.
///
/// The factory calls this once per child, in order, after the parent entity
/// is fully populated. Implementations usually create the child through the
/// factory and then attach it to `parent` in whatever hierarchy system the
/// application has. Returning [`Entity::INVALID`] marks the child as failed;
/// the parent and its remaining children are unaffected.
pub trait CreateChildFn {
    /// Build the entity described by `child` under `parent`.
    fn create_child(&self, factory: &mut EntityFactory, parent: Entity, child: &BlueprintTree<'_>) -> Entity;
}

/// Default hook: every child becomes an independent root entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parentless;

impl CreateChildFn for Parentless {
    fn create_child(&self, factory: &mut EntityFactory, _parent: Entity, child: &BlueprintTree<'_>) -> Entity {
        factory.create_with_tree(child)
    }
}
