//! System-layer error types.

use crate::system::SystemId;

/// Errors raised by the system registry.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// A system of this type already lives in the registry.
    #[error("system '{0}' is already registered")]
    AlreadyRegistered(SystemId),
}

/// One system that was initialized before a prerequisite it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyViolation {
    /// The system that declared the dependency.
    pub system: SystemId,
    /// The prerequisite that was not initialized in time.
    pub dependency: SystemId,
}

impl std::fmt::Display for DependencyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' requires '{}'", self.system, self.dependency)
    }
}

/// Systems were initialized in an order that breaks declared dependencies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("system dependencies not satisfied: {}", format_violations(.violations))]
pub struct DependencyError {
    /// Every violation found, in initialization order.
    pub violations: Vec<DependencyViolation>,
}

fn format_violations(violations: &[DependencyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
