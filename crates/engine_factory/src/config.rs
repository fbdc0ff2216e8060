//! Entity factory configuration.

use std::path::PathBuf;

/// Default suffix appended to logical blueprint names.
pub const DEFAULT_BLUEPRINT_SUFFIX: &str = ".bin";

/// Configuration for an [`EntityFactory`](crate::EntityFactory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Directory blueprint assets are read from.
    pub asset_root: PathBuf,
    /// Suffix appended to a logical blueprint name to form its asset filename.
    pub blueprint_suffix: String,
}

impl FactoryConfig {
    /// Create a config reading blueprints from `asset_root`.
    #[must_use]
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            ..Self::default()
        }
    }

    /// Override the asset root directory.
    #[must_use]
    pub fn with_asset_root(mut self, asset_root: impl Into<PathBuf>) -> Self {
        self.asset_root = asset_root.into();
        self
    }

    /// Override the blueprint filename suffix.
    #[must_use]
    pub fn with_blueprint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.blueprint_suffix = suffix.into();
        self
    }

    /// The asset filename for the logical blueprint `name`.
    #[must_use]
    pub fn blueprint_filename(&self, name: &str) -> String {
        format!("{name}{}", self.blueprint_suffix)
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            blueprint_suffix: DEFAULT_BLUEPRINT_SUFFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suffix() {
        let config = FactoryConfig::default();
        assert_eq!(config.blueprint_filename("player"), "player.bin");
        assert_eq!(config.asset_root, PathBuf::from("."));
    }

    #[test]
    fn test_overrides() {
        let config = FactoryConfig::new("assets").with_blueprint_suffix(".entity");
        assert_eq!(config.blueprint_filename("crate"), "crate.entity");
        assert_eq!(config.asset_root, PathBuf::from("assets"));
        let moved = config.with_asset_root("/data");
        assert_eq!(moved.asset_root, PathBuf::from("/data"));
    }
}
