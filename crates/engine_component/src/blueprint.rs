//! Blueprints, the ordered component lists describing one entity, and
//! blueprint trees, which add ordered child blueprints for entity hierarchies.
//!
//! Both are transient: they are built to drive one creation or one
//! serialisation call and then dropped. Payloads inside loaded blueprints
//! borrow from the asset buffer they were decoded from, hence the lifetime.

use crate::component::{Component, ComponentData, ComponentRecord, DefType};
use crate::error::ComponentError;

/// Ordered, schema-agnostic component data for exactly one entity.
///
/// Consumers read a blueprint only through [`Blueprint::for_each_component`];
/// the container behind it is an implementation detail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blueprint<'a> {
    components: Vec<ComponentRecord<'a>>,
}

impl<'a> Blueprint<'a> {
    /// Create an empty blueprint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Build a blueprint from records, preserving their order.
    #[must_use]
    pub fn from_records(components: Vec<ComponentRecord<'a>>) -> Self {
        Self { components }
    }

    /// Append an encoded record.
    pub fn add_record(&mut self, record: ComponentRecord<'a>) {
        self.components.push(record);
    }

    /// Append a raw tagged payload.
    pub fn add_raw(&mut self, def_type: DefType, data: ComponentData<'a>) {
        self.add_record(ComponentRecord::new(def_type, data));
    }

    /// Encode and append a Rust component.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Encode`] if the value cannot be serialised.
    pub fn add_component<T: Component>(&mut self, value: &T) -> Result<(), ComponentError> {
        self.add_record(ComponentRecord::from_component(value)?);
        Ok(())
    }

    /// Builder form of [`Blueprint::add_component`].
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Encode`] if the value cannot be serialised.
    pub fn with_component<T: Component>(mut self, value: &T) -> Result<Self, ComponentError> {
        self.add_component(value)?;
        Ok(self)
    }

    /// Visit every component record in source order.
    pub fn for_each_component<'s, F>(&'s self, mut f: F)
    where
        F: FnMut(&'s ComponentRecord<'a>),
    {
        for record in &self.components {
            f(record);
        }
    }

    /// Number of component records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the blueprint carries no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// A [`Blueprint`] plus the blueprint trees of its children, in order.
///
/// A node exclusively owns its children, so trees are always acyclic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlueprintTree<'a> {
    blueprint: Blueprint<'a>,
    children: Vec<BlueprintTree<'a>>,
}

impl<'a> BlueprintTree<'a> {
    /// A tree node with the given children.
    #[must_use]
    pub fn new(blueprint: Blueprint<'a>, children: Vec<BlueprintTree<'a>>) -> Self {
        Self {
            blueprint,
            children,
        }
    }

    /// A childless tree node.
    #[must_use]
    pub fn leaf(blueprint: Blueprint<'a>) -> Self {
        Self::new(blueprint, Vec::new())
    }

    /// Append a child subtree.
    pub fn add_child(&mut self, child: BlueprintTree<'a>) {
        self.children.push(child);
    }

    /// Builder form of [`BlueprintTree::add_child`].
    #[must_use]
    pub fn with_child(mut self, child: BlueprintTree<'a>) -> Self {
        self.add_child(child);
        self
    }

    /// The blueprint for this node's own entity.
    #[must_use]
    pub fn blueprint(&self) -> &Blueprint<'a> {
        &self.blueprint
    }

    /// Child subtrees in source order.
    #[must_use]
    pub fn children(&self) -> &[BlueprintTree<'a>] {
        &self.children
    }

    /// Total number of nodes in this tree, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(BlueprintTree::node_count).sum::<usize>()
    }
}

impl<'a> From<Blueprint<'a>> for BlueprintTree<'a> {
    fn from(blueprint: Blueprint<'a>) -> Self {
        Self::leaf(blueprint)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    impl Component for Position {
        fn type_name() -> &'static str {
            "PositionDef"
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Tag(String);

    impl Component for Tag {
        fn type_name() -> &'static str {
            "TagDef"
        }
    }

    #[test]
    fn test_for_each_component_preserves_order() {
        let blueprint = Blueprint::new()
            .with_component(&Tag("first".into()))
            .unwrap()
            .with_component(&Position { x: 1.0, y: 2.0 })
            .unwrap()
            .with_component(&Tag("last".into()))
            .unwrap();

        let mut seen = Vec::new();
        blueprint.for_each_component(|record| seen.push(record.def_type()));
        assert_eq!(
            seen,
            vec![Tag::def_type(), Position::def_type(), Tag::def_type()]
        );
        assert_eq!(blueprint.len(), 3);
    }

    #[test]
    fn test_empty_blueprint() {
        let blueprint = Blueprint::new();
        assert!(blueprint.is_empty());
        let mut calls = 0;
        blueprint.for_each_component(|_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_raw_record_keeps_payload() {
        let mut blueprint = Blueprint::new();
        blueprint.add_raw(DefType::from_name("Opaque"), ComponentData::borrowed(&[1, 2, 3]));
        blueprint.for_each_component(|record| {
            assert_eq!(record.def_type(), DefType::from_name("Opaque"));
            assert_eq!(record.data().as_bytes(), &[1, 2, 3]);
        });
    }

    #[test]
    fn test_tree_structure() {
        let leaf = |name: &str| {
            BlueprintTree::leaf(Blueprint::new().with_component(&Tag(name.into())).unwrap())
        };
        let tree = leaf("root")
            .with_child(leaf("a").with_child(leaf("a.1")))
            .with_child(leaf("b"));

        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.children()[0].children().len(), 1);
        assert!(tree.children()[1].children().is_empty());
        assert_eq!(tree.node_count(), 4);
    }
}
