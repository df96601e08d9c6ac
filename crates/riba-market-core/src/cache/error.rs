use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored value under {key} could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist {key}; in-memory value is ahead of storage: {source}")]
    Persist {
        key: String,
        #[source]
        source: Box<CacheError>,
    },

    #[error("Storage quota exceeded ({used} of {limit} bytes)")]
    QuotaExceeded { used: usize, limit: usize },

    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Cache has been closed")]
    Closed,

    #[error("Cache lock poisoned")]
    Poisoned,
}

impl CacheError {
    /// Wrap a backend failure for the key being written.
    pub(crate) fn persist(key: &str, source: CacheError) -> Self {
        CacheError::Persist {
            key: key.to_string(),
            source: Box::new(source),
        }
    }

    /// True when the error left memory ahead of storage.
    pub fn is_persist_failure(&self) -> bool {
        matches!(self, CacheError::Persist { .. })
    }
}
