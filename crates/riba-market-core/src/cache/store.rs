use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::backend::{FileBackend, MemoryBackend, StorageBackend};
use super::error::CacheError;
use super::key::CacheKey;

/// In-memory state of one key.
#[derive(Debug, Clone)]
enum Slot {
    /// Nothing stored, or the stored value was discarded.
    Empty,
    Value(Value),
    /// Stored text that is not valid JSON.
    Unreadable(String),
}

struct CacheInner {
    backend: Box<dyn StorageBackend>,
    slots: HashMap<CacheKey, Slot>,
    dirty: BTreeSet<CacheKey>,
    closed: bool,
}

impl CacheInner {
    /// Slot for `key`, loading it from the backend on first access.
    fn slot(&mut self, key: &CacheKey) -> Result<&mut Slot, CacheError> {
        if !self.slots.contains_key(key) {
            let slot = match self.backend.load(key.as_str())? {
                None => Slot::Empty,
                Some(text) => match serde_json::from_str::<Value>(&text) {
                    Ok(value) => Slot::Value(value),
                    Err(_) => Slot::Unreadable(text),
                },
            };
            debug!(key = %key, "Loaded cache key");
            self.slots.insert(key.clone(), slot);
        }
        self.slots
            .get_mut(key)
            .ok_or_else(|| CacheError::InvalidKey(key.to_string()))
    }

    /// Decoded value under `key`, or `fallback`. Undecodable values are dropped from memory.
    fn read_or<T: DeserializeOwned>(&mut self, key: &CacheKey, fallback: T) -> T {
        let slot = match self.slot(key) {
            Ok(slot) => slot,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to load cache key, using fallback");
                return fallback;
            }
        };

        let decoded = match &*slot {
            Slot::Empty => return fallback,
            Slot::Value(value) => {
                serde_json::from_value::<T>(value.clone()).map_err(|e| e.to_string())
            }
            Slot::Unreadable(_) => Err("stored text is not valid JSON".to_string()),
        };
        match decoded {
            Ok(value) => value,
            Err(reason) => {
                warn!(key = %key, error = %reason, "Discarding undecodable cache value");
                *slot = Slot::Empty;
                fallback
            }
        }
    }

    fn write_value<T: Serialize + ?Sized>(&mut self, key: &CacheKey, value: &T) -> Result<(), CacheError> {
        let value = serde_json::to_value(value).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.slots.insert(key.clone(), Slot::Value(value));
        self.persist(key)
    }

    fn persist(&mut self, key: &CacheKey) -> Result<(), CacheError> {
        let result = match self.slots.get(key) {
            Some(Slot::Value(value)) => serde_json::to_string_pretty(value)
                .map_err(|source| CacheError::Encode {
                    key: key.to_string(),
                    source,
                })
                .and_then(|text| self.backend.store(key.as_str(), &text)),
            _ => self.backend.remove(key.as_str()),
        };

        match result {
            Ok(()) => {
                self.dirty.remove(key);
                Ok(())
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to persist cache key");
                self.dirty.insert(key.clone());
                Err(CacheError::persist(key.as_str(), e))
            }
        }
    }

    fn flush(&mut self) -> Result<(), CacheError> {
        let pending: Vec<CacheKey> = self.dirty.iter().cloned().collect();
        let mut first_error = None;
        for key in &pending {
            if let Err(e) = self.persist(key) {
                first_error.get_or_insert(e);
            }
        }
        if !pending.is_empty() {
            info!(keys = pending.len(), remaining = self.dirty.len(), "Flushed cache");
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for CacheInner {
    fn drop(&mut self) {
        if self.closed || self.dirty.is_empty() {
            return;
        }
        warn!(keys = self.dirty.len(), "Cache dropped with unsaved keys, flushing");
        if let Err(e) = self.flush() {
            warn!(error = %e, "Final flush failed");
        }
    }
}

/// Process-wide persistent key-value store of JSON documents.
///
/// Values are loaded lazily per key and mirrored in memory. Every mutation
/// writes through to the backend; when that fails the in-memory value still
/// changes, the key is remembered as dirty and the error is returned so the
/// caller can decide what to do. [`flush`](Self::flush) retries dirty keys.
///
/// The handle is cheap to clone; clones share one store.
#[derive(Clone)]
pub struct LocalCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl std::fmt::Debug for LocalCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCache").finish_non_exhaustive()
    }
}

impl LocalCache {
    pub fn open<B: StorageBackend + 'static>(backend: B) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                backend: Box::new(backend),
                slots: HashMap::new(),
                dirty: BTreeSet::new(),
                closed: false,
            })),
        }
    }

    /// Open a cache backed by `<dir>/<key>.json` files.
    pub fn open_dir(dir: PathBuf) -> Result<Self, CacheError> {
        info!(dir = %dir.display(), "Opening local cache");
        Ok(Self::open(FileBackend::new(dir)?))
    }

    /// Cache that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::new())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheInner>, CacheError> {
        let inner = self.inner.lock().map_err(|_| CacheError::Poisoned)?;
        if inner.closed {
            return Err(CacheError::Closed);
        }
        Ok(inner)
    }

    /// Value under `key`, or `fallback` when it is absent or cannot be decoded.
    ///
    /// A value that fails to decode is logged and discarded from memory; the
    /// stored copy is left alone until the next write.
    pub fn read<T: DeserializeOwned>(&self, key: &CacheKey, fallback: T) -> T {
        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache unavailable, using fallback");
                return fallback;
            }
        };
        inner.read_or(key, fallback)
    }

    /// Value under `key`, surfacing load and decode failures.
    pub fn try_read<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>, CacheError> {
        let mut inner = self.lock()?;
        let decode_error = |source| CacheError::Decode {
            key: key.to_string(),
            source,
        };
        match inner.slot(key)? {
            Slot::Empty => Ok(None),
            Slot::Value(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(decode_error),
            Slot::Unreadable(text) => serde_json::from_str(text)
                .map(Some)
                .map_err(decode_error),
        }
    }

    /// Replace the value under `key` and persist it.
    pub fn write<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError> {
        self.lock()?.write_value(key, value)
    }

    /// Compute the next value from the current one (or `fallback`) and write it.
    ///
    /// The read, `f` and the write happen under one lock, so concurrent
    /// updates through cloned handles never lose each other's changes.
    /// Returns the new value. On a persist failure the value is still in
    /// memory and can be read back.
    pub fn update<T, F>(&self, key: &CacheKey, fallback: T, f: F) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        let mut inner = self.lock()?;
        let next = f(inner.read_or(key, fallback));
        inner.write_value(key, &next)?;
        Ok(next)
    }

    /// Drop the stored value; later reads return their fallback.
    pub fn clear(&self, key: &CacheKey) -> Result<(), CacheError> {
        let mut inner = self.lock()?;
        inner.slots.insert(key.clone(), Slot::Empty);
        inner.persist(key)
    }

    /// True when a decodable or undecodable value exists under `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        match self.lock() {
            Ok(mut inner) => matches!(inner.slot(key), Ok(Slot::Value(_)) | Ok(Slot::Unreadable(_))),
            Err(_) => false,
        }
    }

    /// Keys whose in-memory value has not reached storage.
    pub fn dirty_keys(&self) -> Vec<CacheKey> {
        self.lock()
            .map(|inner| inner.dirty.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Keys present in storage.
    pub fn stored_keys(&self) -> Result<Vec<String>, CacheError> {
        self.lock()?.backend.keys()
    }

    /// Retry persisting every dirty key.
    pub fn flush(&self) -> Result<(), CacheError> {
        self.lock()?.flush()
    }

    /// Flush and shut the store. Every handle fails with [`CacheError::Closed`] afterwards.
    ///
    /// If the flush fails the store stays open so it can be retried.
    pub fn close(&self) -> Result<(), CacheError> {
        let mut inner = self.lock()?;
        inner.flush()?;
        inner.closed = true;
        info!("Local cache closed");
        Ok(())
    }
}
