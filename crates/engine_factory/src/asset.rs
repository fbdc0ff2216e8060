//! Blueprint asset retrieval and caching.
//!
//! Reading assets off disk is the job of an [`AssetSource`]. The
//! [`BlueprintCache`] sits in front of it so each blueprint is read once and
//! then shared; it is safe to use from any thread.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::AssetError;

/// Something that can produce the raw bytes of a named asset.
pub trait AssetSource: Send + Sync {
    /// Read the asset stored under `filename`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the asset cannot be read.
    fn load(&self, filename: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    /// Read assets relative to `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectoryAssetSource {
    fn load(&self, filename: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.root.join(filename);
        std::fs::read(&path).map_err(|source| AssetError::Io { path, source })
    }
}

/// Thread-safe cache of blueprint asset bytes keyed by filename.
pub struct BlueprintCache {
    source: Box<dyn AssetSource>,
    assets: DashMap<String, Arc<[u8]>>,
}

impl BlueprintCache {
    /// Create an empty cache in front of `source`.
    #[must_use]
    pub fn new(source: Box<dyn AssetSource>) -> Self {
        Self {
            source,
            assets: DashMap::new(),
        }
    }

    /// The cached bytes of `filename`, reading them from the source on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the asset is not cached and cannot be read.
    pub fn get_or_load(&self, filename: &str) -> Result<Arc<[u8]>, AssetError> {
        if let Some(bytes) = self.assets.get(filename) {
            return Ok(Arc::clone(&bytes));
        }

        // Read outside the map lock; a concurrent reader of the same asset
        // may load it twice, but only the first insert is kept.
        let bytes: Arc<[u8]> = self.source.load(filename)?.into();
        debug!(filename, size = bytes.len(), "loaded blueprint asset");
        Ok(Arc::clone(
            &self.assets.entry(filename.to_string()).or_insert(bytes),
        ))
    }

    /// Put `bytes` in the cache under `filename`, replacing any cached copy.
    pub fn insert(&self, filename: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.assets.insert(filename.into(), bytes.into());
    }

    /// Drop the cached copy of `filename`. Returns `true` if it was cached.
    pub fn release(&self, filename: &str) -> bool {
        self.assets.remove(filename).is_some()
    }

    /// Whether `filename` is cached.
    #[must_use]
    pub fn contains(&self, filename: &str) -> bool {
        self.assets.contains_key(filename)
    }

    /// Number of cached assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl std::fmt::Debug for BlueprintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueprintCache")
            .field("assets", &self.assets.len())
            .finish_non_exhaustive()
    }
}
