//! Riba Market core library.
//!
//! Seller catalogues and items persisted in a local JSON cache, read-only
//! product browsing over static fixtures, session-only accounts and a cart
//! with checkout.
//!
//! Every persistent component shares one [`LocalCache`](cache::LocalCache)
//! handle, opened once at startup and closed at shutdown.

pub mod auth;
pub mod browse;
pub mod cache;
pub mod cart;
pub mod catalogue;
pub mod config;
pub mod fixtures;
pub mod models;
pub mod utils;

pub use cache::{CacheError, CacheKey, LocalCache};
pub use catalogue::{CatalogueError, CatalogueManager, ItemManager, ItemsOwner};
pub use config::Config;
