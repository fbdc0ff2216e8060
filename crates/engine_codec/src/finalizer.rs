//! Finalizer — writes blueprints back into binary entity definitions.
//!
//! Each component record is wrapped in a component table holding its wire
//! index and its already-encoded payload; the payload bytes are embedded as
//! they are, never re-encoded.

use std::marker::PhantomData;

use engine_component::{Blueprint, BlueprintTree};
use tracing::warn;

use crate::codec;
use crate::error::CodecError;
use crate::schema::{ComponentDef, EntityDef, EntitySchema};
use crate::type_table::TypeList;

/// Converts blueprints into binary entity definitions.
pub trait BlueprintFinalizer {
    /// Encode a single entity's blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnregisteredDefType`] if a record's type has no
    /// wire index, or [`CodecError::Encode`] if encoding fails.
    fn finalize(&self, types: &TypeList, blueprint: &Blueprint<'_>) -> Result<Vec<u8>, CodecError>;

    /// Encode a blueprint tree, children included.
    ///
    /// # Errors
    ///
    /// As [`BlueprintFinalizer::finalize`].
    fn finalize_tree(&self, types: &TypeList, tree: &BlueprintTree<'_>) -> Result<Vec<u8>, CodecError>;
}

/// [`BlueprintFinalizer`] generated for an [`EntitySchema`].
#[derive(Debug)]
pub struct SchemaFinalizer<S> {
    _schema: PhantomData<fn() -> S>,
}

impl<S: EntitySchema> SchemaFinalizer<S> {
    /// Create a finalizer for schema `S`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _schema: PhantomData,
        }
    }
}

impl<S: EntitySchema> Default for SchemaFinalizer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntitySchema> BlueprintFinalizer for SchemaFinalizer<S> {
    fn finalize(&self, types: &TypeList, blueprint: &Blueprint<'_>) -> Result<Vec<u8>, CodecError> {
        encode_blueprint::<S::EntityDef<'_>>(types, blueprint)
    }

    fn finalize_tree(&self, types: &TypeList, tree: &BlueprintTree<'_>) -> Result<Vec<u8>, CodecError> {
        let def = entity_def_from_tree::<S::EntityDef<'_>>(types, tree)?;
        codec::encode(&def)
    }
}

fn encode_blueprint<'b, E: EntityDef<'b>>(
    types: &TypeList,
    blueprint: &'b Blueprint<'_>,
) -> Result<Vec<u8>, CodecError> {
    let components = component_defs::<E>(types, blueprint)?;
    codec::encode(&E::from_parts(components, Vec::new()))
}

/// Wrap every record of `blueprint` in a component table, in source order.
fn component_defs<'b, E: EntityDef<'b>>(
    types: &TypeList,
    blueprint: &'b Blueprint<'_>,
) -> Result<Vec<E::Component>, CodecError> {
    let mut defs = Vec::with_capacity(blueprint.len());
    let mut result = Ok(());
    blueprint.for_each_component(|record| {
        if result.is_err() {
            return;
        }
        match types.index_of(record.def_type()) {
            Some(index) => defs.push(<E::Component as ComponentDef<'b>>::from_parts(
                index,
                record.data().reborrow(),
            )),
            None => result = Err(CodecError::UnregisteredDefType(record.def_type())),
        }
    });
    result.map(|()| defs)
}

fn entity_def_from_tree<'b, E: EntityDef<'b>>(
    types: &TypeList,
    tree: &'b BlueprintTree<'_>,
) -> Result<E, CodecError> {
    let components = component_defs::<E>(types, tree.blueprint())?;
    let children = tree
        .children()
        .iter()
        .map(|child| entity_def_from_tree::<E>(types, child))
        .collect::<Result<Vec<_>, _>>()?;

    let expected = children.len();
    let def = E::from_parts(components, children);
    if def.children().len() != expected {
        warn!(
            expected,
            written = def.children().len(),
            "schema has no children field; child entities were not written"
        );
    }
    Ok(def)
}
