//! Schema adapters for application-defined entity definitions.
//!
//! Every application defines its own binary entity format: an entity-level
//! table holding a list of component wrapper tables (each a wire index plus
//! an encoded payload) and, optionally, a list of nested entity tables for
//! children. The loader and finalizer only ever see that format through the
//! traits here, so they stay agnostic of the concrete layout.
//!
//! Schemas without nesting still implement [`EntityDef::children`] and simply
//! return an empty slice.

use engine_component::ComponentData;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::CodecError;

/// A component wrapper table: a wire index and the component's payload.
pub trait ComponentDef<'a>: Sized {
    /// Index of the component's schema name in the type list.
    fn def_type(&self) -> usize;

    /// The encoded component, if the table carries one.
    fn def(&self) -> Option<&ComponentData<'a>>;

    /// Build a wrapper table around an already-encoded payload.
    fn from_parts(def_type: usize, def: ComponentData<'a>) -> Self;
}

/// An entity-level table.
pub trait EntityDef<'a>: Sized + Serialize {
    /// The component wrapper table type of this schema.
    type Component: ComponentDef<'a>;

    /// Component wrapper tables in source order.
    fn components(&self) -> &[Self::Component];

    /// Nested entity tables in source order. Empty for flat schemas.
    fn children(&self) -> &[Self];

    /// Build an entity table. Flat schemas drop `children`.
    fn from_parts(components: Vec<Self::Component>, children: Vec<Self>) -> Self;
}

/// A family of entity tables that can be read out of a byte buffer.
pub trait EntitySchema: 'static {
    /// The entity table, borrowing from the buffer it was read from.
    type EntityDef<'a>: EntityDef<'a>;

    /// Obtain the root entity table from a buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the buffer is not a valid root table.
    fn root(data: &[u8]) -> Result<Self::EntityDef<'_>, CodecError>;
}

/// Component wrapper table of [`StandardSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardComponentDef<'a> {
    /// Wire index of the component type.
    pub def_type: usize,
    /// Encoded component payload.
    #[serde(borrow, default)]
    pub def: Option<ComponentData<'a>>,
}

impl<'a> ComponentDef<'a> for StandardComponentDef<'a> {
    fn def_type(&self) -> usize {
        self.def_type
    }

    fn def(&self) -> Option<&ComponentData<'a>> {
        self.def.as_ref()
    }

    fn from_parts(def_type: usize, def: ComponentData<'a>) -> Self {
        Self {
            def_type,
            def: Some(def),
        }
    }
}

/// Entity table of [`StandardSchema`], with nested children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardEntityDef<'a> {
    /// Component wrapper tables.
    #[serde(borrow, default)]
    pub components: Vec<StandardComponentDef<'a>>,
    /// Child entity tables.
    #[serde(borrow, default)]
    pub children: Vec<StandardEntityDef<'a>>,
}

impl<'a> EntityDef<'a> for StandardEntityDef<'a> {
    type Component = StandardComponentDef<'a>;

    fn components(&self) -> &[Self::Component] {
        &self.components
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn from_parts(components: Vec<Self::Component>, children: Vec<Self>) -> Self {
        Self {
            components,
            children,
        }
    }
}

/// Ready-made hierarchical schema: MessagePack maps of
/// `{ components: [{ def_type, def }], children: [...] }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSchema;

impl EntitySchema for StandardSchema {
    type EntityDef<'a> = StandardEntityDef<'a>;

    fn root(data: &[u8]) -> Result<Self::EntityDef<'_>, CodecError> {
        codec::decode(data)
    }
}
