//! Object storage capability used by the PID stage.
//!
//! The backing store is external; the pipeline only needs existence checks,
//! whole-object reads, and whole-object writes. Calls may block, so async
//! callers run them on the blocking pool.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

/// Narrow blocking interface over an object store.
pub trait StorageService: Send + Sync {
    /// Whether an object exists at `path`.
    fn file_exists(&self, path: &str) -> Result<bool>;

    /// Read the whole object at `path` as raw bytes.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or replace the object at `path`.
    fn write(&self, path: &str, contents: &[u8]) -> Result<()>;
}

/// Thread-safe in-process object store.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageService for InMemoryStorage {
    fn file_exists(&self, path: &str) -> Result<bool> {
        let objects = self
            .objects
            .read()
            .map_err(|_| anyhow!("storage lock poisoned"))?;
        Ok(objects.contains_key(path))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let objects = self
            .objects
            .read()
            .map_err(|_| anyhow!("storage lock poisoned"))?;
        objects
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no object at {path}"))
    }

    fn write(&self, path: &str, contents: &[u8]) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| anyhow!("storage lock poisoned"))?;
        objects.insert(path.to_string(), contents.to_vec());
        Ok(())
    }
}

/// Object store backed by files under a root directory.
///
/// Object paths are taken relative to the root; a leading `/` is ignored.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl StorageService for LocalStorage {
    fn file_exists(&self, path: &str) -> Result<bool> {
        Ok(self.resolve(path).is_file())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path);
        std::fs::read(&full).with_context(|| format!("failed to read {}", full.display()))
    }

    fn write(&self, path: &str, contents: &[u8]) -> Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&full, contents)
            .with_context(|| format!("failed to write {}", full.display()))?;
        debug!(path = %full.display(), bytes = contents.len(), "object written");
        Ok(())
    }
}
