//! # engine_codec
//!
//! Binary entity-definition codec for the entity factory.
//!
//! This crate provides:
//!
//! - [`codec`] — MessagePack serialisation/deserialisation helpers.
//! - [`schema`] — the adapter traits an application implements for its own
//!   entity-definition layout, plus the ready-made [`StandardSchema`].
//! - [`type_table`] — the wire index ↔ [`DefType`](engine_component::DefType)
//!   list shared by loading and finalizing.
//! - [`loader`] — bytes → [`BlueprintTree`](engine_component::BlueprintTree).
//! - [`finalizer`] — [`Blueprint`](engine_component::Blueprint) → bytes.
//! - [`error`] — codec error types.

pub mod codec;
pub mod error;
pub mod finalizer;
pub mod loader;
pub mod schema;
pub mod type_table;

pub use codec::{decode, encode};
pub use error::CodecError;
pub use finalizer::{BlueprintFinalizer, SchemaFinalizer};
pub use loader::{BlueprintLoader, SchemaLoader};
pub use schema::{
    ComponentDef, EntityDef, EntitySchema, StandardComponentDef, StandardEntityDef, StandardSchema,
};
pub use type_table::TypeList;
