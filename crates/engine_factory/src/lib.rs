//! # engine_factory
//!
//! Builds entities from blueprints and blueprint assets, and serialises
//! blueprints back to binary entity definitions.
//!
//! This crate provides:
//!
//! - [`EntityFactory`] — system table, creation, destruction and
//!   finalization.
//! - [`CreateChildFn`] — the hook that turns child blueprints into entities;
//!   [`Parentless`] is the default.
//! - [`DestructionQueue`] — thread-safe pending-destruction queue.
//! - [`BlueprintCache`] / [`AssetSource`] — blueprint asset retrieval.
//! - [`FactoryConfig`] — asset root and filename conventions.

pub mod asset;
pub mod config;
pub mod error;
pub mod factory;
pub mod hierarchy;
pub mod queue;

pub use asset::{AssetSource, BlueprintCache, DirectoryAssetSource};
pub use config::FactoryConfig;
pub use error::{AssetError, FactoryError};
pub use factory::{BlueprintMap, EntityFactory};
pub use hierarchy::{CreateChildFn, Parentless};
pub use queue::DestructionQueue;
