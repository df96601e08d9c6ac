//! Read-only product views over the fixtures.
//!
//! Filtering and sorting are pure functions of the fixture list and the
//! caller's [`ProductFilter`] and [`ProductSort`]; nothing here is persisted.

pub mod filter;
pub mod listing;
pub mod sort;

pub use filter::{CategorySelection, PriceRange, ProductFilter, ALL_CATEGORIES, DEFAULT_MAX_PRICE};
pub use listing::{product, related, store_listings, Listing};
pub use sort::ProductSort;

use crate::fixtures;
use crate::models::Product;

/// Fixture products passing `filter`, ordered by `sort`.
pub fn browse(filter: &ProductFilter, sort: ProductSort) -> Vec<&'static Product> {
    let mut products = filter.apply(fixtures::products());
    sort.sort(&mut products);
    products
}

/// Distinct product categories in fixture order.
pub fn product_categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for product in fixtures::products() {
        if !seen.contains(&product.category.as_str()) {
            seen.push(product.category.as_str());
        }
    }
    seen
}
