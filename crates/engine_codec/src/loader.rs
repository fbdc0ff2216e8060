//! Loader — turns raw entity-definition bytes into a [`BlueprintTree`].

use std::marker::PhantomData;

use engine_component::{Blueprint, BlueprintTree};
use tracing::warn;

use crate::error::CodecError;
use crate::schema::{ComponentDef, EntityDef, EntitySchema};
use crate::type_table::TypeList;

/// Converts binary entity definitions into blueprint trees.
///
/// The returned tree borrows its component payloads from `data`.
pub trait BlueprintLoader {
    /// Decode `data` into a blueprint tree, translating wire indices through
    /// `types`.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if `data` is not a valid entity definition.
    fn load<'a>(&self, types: &TypeList, data: &'a [u8]) -> Result<BlueprintTree<'a>, CodecError>;
}

/// [`BlueprintLoader`] generated for an [`EntitySchema`].
#[derive(Debug)]
pub struct SchemaLoader<S> {
    _schema: PhantomData<fn() -> S>,
}

impl<S: EntitySchema> SchemaLoader<S> {
    /// Create a loader for schema `S`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _schema: PhantomData,
        }
    }
}

impl<S: EntitySchema> Default for SchemaLoader<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntitySchema> BlueprintLoader for SchemaLoader<S> {
    fn load<'a>(&self, types: &TypeList, data: &'a [u8]) -> Result<BlueprintTree<'a>, CodecError> {
        let root = S::root(data)?;
        Ok(tree_from_entity_def(types, &root))
    }
}

/// Build a blueprint tree from an entity table and, recursively, its children.
///
/// Component tables with an out-of-range wire index or without a payload are
/// skipped; the remaining components keep their order.
pub fn tree_from_entity_def<'a, E: EntityDef<'a>>(types: &TypeList, def: &E) -> BlueprintTree<'a> {
    let mut blueprint = Blueprint::new();
    for component in def.components() {
        let index = component.def_type();
        match (types.get(index), component.def()) {
            (Some(def_type), Some(data)) => blueprint.add_raw(def_type, data.clone()),
            (None, _) => warn!(index, "skipping component with unknown type index"),
            (Some(def_type), None) => warn!(%def_type, "skipping component without data"),
        }
    }

    let children = def
        .children()
        .iter()
        .map(|child| tree_from_entity_def(types, child))
        .collect();

    BlueprintTree::new(blueprint, children)
}

#[cfg(test)]
mod tests {
    use engine_component::{ComponentData, DefType};

    use super::*;
    use crate::codec;
    use crate::schema::{StandardComponentDef, StandardEntityDef, StandardSchema};

    fn names() -> TypeList {
        TypeList::from_names(["NONE", "TransformDef", "NameDef"])
    }

    fn component(index: usize, payload: &[u8]) -> StandardComponentDef<'_> {
        StandardComponentDef::from_parts(index, ComponentData::borrowed(payload))
    }

    fn collect_types(tree: &BlueprintTree<'_>) -> Vec<DefType> {
        let mut types = Vec::new();
        tree.blueprint()
            .for_each_component(|record| types.push(record.def_type()));
        types
    }

    #[test]
    fn test_load_translates_indices_in_order() {
        let def = StandardEntityDef::from_parts(vec![component(2, &[0xc0]), component(1, &[0xc3])], Vec::new());
        let bytes = codec::encode(&def).unwrap();

        let tree = SchemaLoader::<StandardSchema>::new().load(&names(), &bytes).unwrap();
        assert_eq!(
            collect_types(&tree),
            vec![DefType::from_name("NameDef"), DefType::from_name("TransformDef")]
        );
        assert!(tree.children().is_empty());
    }

    #[test]
    fn test_load_preserves_children() {
        let grandchild = StandardEntityDef::from_parts(vec![component(2, &[0xc0])], Vec::new());
        let child = StandardEntityDef::from_parts(vec![component(1, &[0xc0])], vec![grandchild]);
        let root = StandardEntityDef::from_parts(Vec::new(), vec![child, StandardEntityDef::default()]);
        let bytes = codec::encode(&root).unwrap();

        let tree = SchemaLoader::<StandardSchema>::new().load(&names(), &bytes).unwrap();
        assert!(tree.blueprint().is_empty());
        assert_eq!(tree.children().len(), 2);
        assert_eq!(
            collect_types(&tree.children()[0]),
            vec![DefType::from_name("TransformDef")]
        );
        assert_eq!(tree.children()[0].children().len(), 1);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_load_skips_unknown_indices() {
        let def = StandardEntityDef::from_parts(
            vec![
                component(9, &[0xc0]),
                StandardComponentDef {
                    def_type: 1,
                    def: None,
                },
                component(2, &[0xc0]),
            ],
            Vec::new(),
        );
        let bytes = codec::encode(&def).unwrap();

        let tree = SchemaLoader::<StandardSchema>::new().load(&names(), &bytes).unwrap();
        assert_eq!(collect_types(&tree), vec![DefType::from_name("NameDef")]);
    }

    #[test]
    fn test_loaded_payloads_borrow_from_buffer() {
        let def = StandardEntityDef::from_parts(vec![component(1, &[0x93, 1, 2, 3])], Vec::new());
        let bytes = codec::encode(&def).unwrap();

        let tree = SchemaLoader::<StandardSchema>::new().load(&names(), &bytes).unwrap();
        tree.blueprint().for_each_component(|record| {
            assert!(record.data().is_borrowed());
            assert_eq!(record.data().as_bytes(), &[0x93, 1, 2, 3]);
        });
    }

    #[test]
    fn test_load_invalid_bytes() {
        let result = SchemaLoader::<StandardSchema>::new().load(&names(), &[0xc1]);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }
}
