//! # engine_component
//!
//! The data side of entity construction: what an entity is and how its
//! component data is described before any system sees it.
//!
//! This crate provides:
//!
//! - [`Entity`] — lightweight `u64` entity identifiers.
//! - [`EntityGenerator`] — thread-safe, monotonically increasing id issuer.
//! - [`DefType`] — FNV-1a hashed component schema tags.
//! - [`Component`] — the contract for Rust types stored in blueprints.
//! - [`ComponentRecord`] — a tagged, schema-agnostic component payload.
//! - [`Blueprint`] / [`BlueprintTree`] — component lists for one entity and
//!   for entity hierarchies.

pub mod blueprint;
pub mod component;
pub mod entity;
pub mod error;

pub use blueprint::{Blueprint, BlueprintTree};
pub use component::{Component, ComponentData, ComponentRecord, DefType};
pub use entity::{Entity, EntityGenerator};
pub use error::ComponentError;
