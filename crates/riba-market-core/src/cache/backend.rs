//! Storage backends behind the local cache.
//!
//! A backend only moves encoded text in and out of durable storage; all JSON
//! handling and the in-memory mirror live in [`LocalCache`](super::LocalCache).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::error::CacheError;

/// Durable storage for cache values, one text document per key.
pub trait StorageBackend: Send {
    /// Read the stored text for `key`, `None` when nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Replace the stored text for `key`.
    fn store(&mut self, key: &str, contents: &str) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), CacheError>;

    /// All keys currently stored.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

// ============================================================================
// File backend
// ============================================================================

/// Extension of every cache document on disk.
const FILE_EXTENSION: &str = "json";

/// One `<key>.json` file per key inside a cache directory.
#[derive(Debug)]
pub struct FileBackend {
    cache_dir: PathBuf,
}

impl FileBackend {
    pub fn new(cache_dir: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        validate_key(key)?;
        Ok(self.cache_dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

/// Keys become file names, so anything that could escape the directory is refused.
fn validate_key(key: &str) -> Result<(), CacheError> {
    let bad = key.is_empty()
        || key.contains('/')
        || key.contains('\\')
        || key.contains("..")
        || key.chars().any(char::is_control);
    if bad {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl StorageBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.cache_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(contents))
    }

    fn store(&mut self, key: &str, contents: &str) -> Result<(), CacheError> {
        let path = self.cache_path(key)?;
        // Write beside the target then rename, so readers never see half a document
        let tmp = path.with_extension(format!("{}.tmp", FILE_EXTENSION));
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)?;
        debug!(key, bytes = contents.len(), "Wrote cache file");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        let path = self.cache_path(key)?;
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

// ============================================================================
// Memory backend
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

/// In-process backend with an optional byte quota.
///
/// Clones share the same storage, so a test can keep a handle to corrupt
/// values or change the quota after giving the backend to a cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses writes once stored text would exceed `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        let backend = Self::new();
        backend.set_quota(Some(limit));
        backend
    }

    pub fn set_quota(&self, limit: Option<usize>) {
        if let Ok(mut state) = self.state.lock() {
            state.quota = limit;
        }
    }

    /// Store text verbatim, bypassing quota and encoding.
    pub fn insert_raw(&self, key: &str, contents: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.values.insert(key.to_string(), contents.to_string());
        }
    }

    /// Stored text for `key`, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.values.get(key).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, CacheError> {
        self.state.lock().map_err(|_| CacheError::Poisoned)
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn store(&mut self, key: &str, contents: &str) -> Result<(), CacheError> {
        let mut state = self.lock()?;
        if let Some(limit) = state.quota {
            let others: usize = state
                .values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let used = others + key.len() + contents.len();
            if used > limit {
                return Err(CacheError::QuotaExceeded { used, limit });
            }
        }
        state.values.insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        self.lock()?.values.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = self.lock()?.values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("riba-backend-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_backend_round_trip_and_remove() {
        let dir = scratch_dir("roundtrip");
        let mut backend = FileBackend::new(dir.clone()).unwrap();

        assert_eq!(backend.load("riba_catalogue").unwrap(), None);
        backend.store("riba_catalogue", "[]").unwrap();
        assert_eq!(backend.load("riba_catalogue").unwrap().as_deref(), Some("[]"));
        assert!(dir.join("riba_catalogue.json").exists());
        assert_eq!(backend.keys().unwrap(), vec!["riba_catalogue".to_string()]);

        backend.remove("riba_catalogue").unwrap();
        assert_eq!(backend.load("riba_catalogue").unwrap(), None);
        // Removing twice is fine
        backend.remove("riba_catalogue").unwrap();

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_backend_rejects_path_like_keys() {
        let dir = scratch_dir("keys");
        let mut backend = FileBackend::new(dir.clone()).unwrap();

        for key in ["", "../escape", "a/b", "a\\b"] {
            assert!(matches!(
                backend.store(key, "{}"),
                Err(CacheError::InvalidKey(_))
            ));
        }

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_memory_backend_quota() {
        let mut backend = MemoryBackend::with_quota(20);
        backend.store("k", "0123456789").unwrap();
        let err = backend.store("other", "0123456789").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { limit: 20, .. }));

        // Overwriting the same key only counts the new value
        backend.store("k", "012345678901234").unwrap();

        backend.set_quota(None);
        backend.store("other", "0123456789").unwrap();
        assert_eq!(backend.keys().unwrap().len(), 2);
    }

    #[test]
    fn test_memory_backend_clones_share_storage() {
        let backend = MemoryBackend::new();
        let mut writer = backend.clone();
        writer.store("k", "1").unwrap();
        assert_eq!(backend.raw("k").as_deref(), Some("1"));
    }
}
