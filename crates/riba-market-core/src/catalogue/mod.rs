//! Seller catalogues and their items.
//!
//! - [`CatalogueManager`]: catalogue CRUD, duplication, visibility and selection
//! - [`ItemManager`]: item CRUD scoped to one [`ItemsOwner`]
//! - [`public_view`]: the read-only page behind a share link
//! - [`SellerProfileStore`]: the seller details shown on public pages
//!
//! Every mutation writes through the shared [`LocalCache`](crate::cache::LocalCache).
//! When a write fails the in-memory state still changes and the error is
//! returned as [`CatalogueError::Cache`].

pub mod error;
pub mod items;
pub mod manager;
pub mod profile;
pub mod public;

pub use error::{CatalogueError, ValidationError};
pub use items::{item_stats, ItemManager, ItemsOwner};
pub use manager::{share_path, share_url, CatalogueManager, COPY_SUFFIX};
pub use profile::{check_logo_size, SellerProfileStore, MAX_LOGO_BYTES};
pub use public::{public_view, ItemQuery, ItemSort, PublicCatalogueView, PublicViewError};
