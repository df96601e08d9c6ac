//! Local caching module for offline data access.
//!
//! This module provides the [`LocalCache`], a persistent key-value store of
//! JSON documents that every component shares. Each key maps to one stored
//! document; collections are stored as whole JSON arrays and rewritten on
//! every mutation.
//!
//! - [`StorageBackend`]: where documents go ([`FileBackend`], [`MemoryBackend`])
//! - [`CacheKey`]: the fixed key layout of the marketplace
//! - [`Collection`]: id-indexed ordered records persisted as arrays

pub mod backend;
pub mod collection;
pub mod error;
pub mod key;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use collection::{Collection, Record};
pub use error::CacheError;
pub use key::CacheKey;
pub use store::LocalCache;
