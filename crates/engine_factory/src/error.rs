//! Factory error types.

use std::path::PathBuf;

use engine_codec::CodecError;
use engine_system::{DependencyError, SystemError};

/// Errors raised while reading blueprint assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The asset could not be read.
    #[error("failed to read asset {path}: {source}")]
    Io {
        /// Full path of the asset.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the entity factory.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// Raw blueprint data was supplied but no loader is configured.
    #[error("no blueprint loader configured")]
    MissingLoader,

    /// A blueprint was finalized but no finalizer is configured.
    #[error("no blueprint finalizer configured")]
    MissingFinalizer,

    /// Systems were initialized out of dependency order.
    #[error(transparent)]
    Dependency(#[from] DependencyError),

    /// A system could not be registered.
    #[error(transparent)]
    System(#[from] SystemError),

    /// The sentinel entity was passed where a live entity is required.
    #[error("cannot populate the invalid entity")]
    InvalidEntity,

    /// Blueprint bytes could not be loaded or written.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A blueprint asset could not be read.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl FactoryError {
    /// Whether this error means the factory itself is misconfigured, as
    /// opposed to a problem with the data it was given.
    #[must_use]
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Self::MissingLoader | Self::MissingFinalizer | Self::Dependency(_) | Self::System(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_faults() {
        assert!(FactoryError::MissingLoader.is_configuration_fault());
        assert!(FactoryError::MissingFinalizer.is_configuration_fault());
        assert!(!FactoryError::InvalidEntity.is_configuration_fault());
        let dependency = DependencyError {
            violations: Vec::new(),
        };
        assert!(FactoryError::from(dependency).is_configuration_fault());
    }
}
