//! Data models for Riba Market entities.
//!
//! This module contains the records the marketplace works with:
//!
//! - `Catalogue`, `CatalogueItem`: seller-managed records persisted in the local cache
//! - `SellerProfile`: the seller's public details
//! - `Product`, `Order`, `Address`, `Review`: static fixture records
//! - `UserAccount`: session-only accounts
//! - Typed ids and `Price`

pub mod account;
pub mod catalogue;
pub mod ids;
pub mod item;
pub mod order;
pub mod price;
pub mod product;
pub mod profile;

pub use account::{UserAccount, UserType};
pub use catalogue::{
    Catalogue, CatalogueCategory, CatalogueDraft, CatalogueStats, Customization, UnknownCategory,
};
pub use ids::{AddressId, CatalogueId, CatalogueItemId, OrderId, ProductId, ReviewId, UserId};
pub use item::{CatalogueItem, ItemDraft, ItemStatus};
pub use order::{Address, Order, OrderLine, OrderStatus, Review};
pub use price::Price;
pub use product::{Product, ProductBadge, StoreType};
pub use profile::SellerProfile;
