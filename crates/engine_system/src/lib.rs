//! # engine_system
//!
//! The system side of entity construction.
//!
//! This crate provides:
//!
//! - [`System`] — the trait every component-processing system implements.
//! - [`SystemId`] — stable runtime identity of a system type.
//! - [`Registry`] — the container that owns systems and looks them up by type.
//! - [`DependencyChecker`] — verifies systems were initialized after the
//!   systems they depend on.

pub mod dependency;
pub mod error;
pub mod registry;
pub mod system;

pub use dependency::DependencyChecker;
pub use error::{DependencyError, DependencyViolation, SystemError};
pub use registry::Registry;
pub use system::{System, SystemId};
