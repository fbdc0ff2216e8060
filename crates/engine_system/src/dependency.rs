//! Initialization-order checking for systems.
//!
//! Systems declare prerequisites when they are registered. As each system is
//! initialized the checker records it, and any prerequisite that has not been
//! initialized yet at that moment is a violation. [`DependencyChecker::check`]
//! reports every violation found.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{DependencyError, DependencyViolation};
use crate::system::SystemId;

/// Tracks declared prerequisites and initialization order.
#[derive(Debug, Default)]
pub struct DependencyChecker {
    /// Declared prerequisites per system, in declaration order.
    dependencies: HashMap<SystemId, Vec<SystemId>>,
    /// Systems initialized so far.
    initialized: HashSet<SystemId>,
    /// Violations recorded by [`DependencyChecker::mark_initialized`].
    violations: Vec<DependencyViolation>,
}

impl DependencyChecker {
    /// Create an empty checker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `system` must be initialized after `dependency`.
    pub fn register_dependency(&mut self, system: SystemId, dependency: SystemId) {
        let deps = self.dependencies.entry(system).or_default();
        if !deps.contains(&dependency) {
            debug!(%system, %dependency, "registered dependency");
            deps.push(dependency);
        }
    }

    /// Declared prerequisites of `system`.
    #[must_use]
    pub fn dependencies_of(&self, system: SystemId) -> &[SystemId] {
        self.dependencies
            .get(&system)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Record that `system` has just been initialized.
    pub fn mark_initialized(&mut self, system: SystemId) {
        if let Some(deps) = self.dependencies.get(&system) {
            for &dependency in deps {
                if !self.initialized.contains(&dependency) {
                    self.violations.push(DependencyViolation { system, dependency });
                }
            }
        }
        self.initialized.insert(system);
    }

    /// Whether `system` has been initialized.
    #[must_use]
    pub fn is_initialized(&self, system: SystemId) -> bool {
        self.initialized.contains(&system)
    }

    /// Confirm every system was initialized after its prerequisites.
    ///
    /// # Errors
    ///
    /// Returns a [`DependencyError`] listing every violation.
    pub fn check(&self) -> Result<(), DependencyError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(DependencyError {
                violations: self.violations.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Transform;
    struct Render;
    struct Audio;

    fn checker_with_render_on_transform() -> DependencyChecker {
        let mut checker = DependencyChecker::new();
        checker.register_dependency(SystemId::of::<Render>(), SystemId::of::<Transform>());
        checker
    }

    #[test]
    fn test_dependency_first_passes() {
        let mut checker = checker_with_render_on_transform();
        checker.mark_initialized(SystemId::of::<Transform>());
        checker.mark_initialized(SystemId::of::<Render>());
        assert!(checker.check().is_ok());
    }

    #[test]
    fn test_dependent_first_fails() {
        let mut checker = checker_with_render_on_transform();
        checker.mark_initialized(SystemId::of::<Render>());
        checker.mark_initialized(SystemId::of::<Transform>());

        let err = checker.check().unwrap_err();
        assert_eq!(
            err.violations,
            vec![DependencyViolation {
                system: SystemId::of::<Render>(),
                dependency: SystemId::of::<Transform>(),
            }]
        );
        assert!(err.to_string().contains("Render"));
    }

    #[test]
    fn test_missing_dependency_fails() {
        let mut checker = checker_with_render_on_transform();
        checker.mark_initialized(SystemId::of::<Render>());
        assert!(checker.check().is_err());
    }

    #[test]
    fn test_duplicate_declaration_is_ignored() {
        let mut checker = checker_with_render_on_transform();
        checker.register_dependency(SystemId::of::<Render>(), SystemId::of::<Transform>());
        assert_eq!(checker.dependencies_of(SystemId::of::<Render>()).len(), 1);
        assert!(checker.dependencies_of(SystemId::of::<Audio>()).is_empty());
    }

    #[test]
    fn test_no_dependencies() {
        let mut checker = DependencyChecker::new();
        checker.mark_initialized(SystemId::of::<Audio>());
        assert!(checker.is_initialized(SystemId::of::<Audio>()));
        assert!(checker.check().is_ok());
    }
}
