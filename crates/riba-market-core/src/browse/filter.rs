use std::collections::BTreeSet;

use crate::models::{Price, Product, StoreType};
use crate::utils::contains_ignore_case;

/// Label of the catch-all category entry.
pub const ALL_CATEGORIES: &str = "All";

/// Upper bound of the default price range.
pub const DEFAULT_MAX_PRICE: Price = Price::new(300_000);

/// Which product categories are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    #[default]
    All,
    /// Never empty; an emptied selection becomes `All`.
    Only(BTreeSet<String>),
}

impl CategorySelection {
    pub fn only<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        if set.is_empty() || set.contains(ALL_CATEGORIES) {
            CategorySelection::All
        } else {
            CategorySelection::Only(set)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategorySelection::All)
    }

    /// Flip one category. Choosing `All` clears the set, and removing the
    /// last selected category falls back to `All`.
    pub fn toggle(&mut self, category: &str) {
        if category == ALL_CATEGORIES {
            *self = CategorySelection::All;
            return;
        }
        let mut set = match std::mem::take(self) {
            CategorySelection::All => BTreeSet::new(),
            CategorySelection::Only(set) => set,
        };
        if !set.remove(category) {
            set.insert(category.to_string());
        }
        *self = if set.is_empty() {
            CategorySelection::All
        } else {
            CategorySelection::Only(set)
        };
    }

    pub fn includes(&self, category: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Only(set) => set.contains(category),
        }
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

impl PriceRange {
    /// Bounds given in either order.
    pub fn new(a: impl Into<Price>, b: impl Into<Price>) -> Self {
        let (a, b) = (a.into(), b.into());
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Price::ZERO,
            max: DEFAULT_MAX_PRICE,
        }
    }
}

/// Conjunction of every product filter on the browse page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub categories: CategorySelection,
    pub price: PriceRange,
    pub verified_only: bool,
    /// Empty means any store type.
    pub store_types: BTreeSet<StoreType>,
    /// Matched against the product name, ignoring case.
    pub search: String,
}

impl ProductFilter {
    pub fn toggle_store_type(&mut self, store_type: StoreType) {
        if !self.store_types.remove(&store_type) {
            self.store_types.insert(store_type);
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let query = self.search.trim().to_lowercase();
        self.matches_with(product, &query)
    }

    fn matches_with(&self, product: &Product, query: &str) -> bool {
        contains_ignore_case(&product.name, query)
            && self.categories.includes(&product.category)
            && self.price.contains(product.price)
            && (!self.verified_only || product.store_verified)
            && (self.store_types.is_empty() || self.store_types.contains(&product.store_type))
    }

    /// Products passing the filter, in their original order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let query = self.search.trim().to_lowercase();
        products
            .iter()
            .filter(|p| self.matches_with(p, &query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_category_toggle_semantics() {
        let mut selection = CategorySelection::default();
        selection.toggle("Food");
        assert_eq!(selection, CategorySelection::only(["Food"]));
        selection.toggle("Fashion");
        assert!(selection.includes("Fashion") && selection.includes("Food"));
        assert!(!selection.includes("Services"));

        selection.toggle("Food");
        selection.toggle("Fashion");
        assert!(selection.is_all());

        selection.toggle("Food");
        selection.toggle(ALL_CATEGORIES);
        assert!(selection.is_all());
    }

    #[test]
    fn test_only_with_nothing_is_all() {
        assert!(CategorySelection::only(Vec::<String>::new()).is_all());
        assert!(CategorySelection::only(["All", "Food"]).is_all());
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let range = PriceRange::new(15_000u64, 5_000u64);
        assert_eq!(range.min, Price::new(5_000));
        assert!(range.contains(Price::new(5_000)));
        assert!(range.contains(Price::new(15_000)));
        assert!(!range.contains(Price::new(15_001)));
    }

    #[test]
    fn test_default_filter_shows_every_fixture() {
        let products = fixtures::products();
        let shown = ProductFilter::default().apply(products);
        assert_eq!(shown.len(), products.len());
    }

    #[test]
    fn test_filters_combine() {
        let mut filter = ProductFilter {
            verified_only: true,
            ..ProductFilter::default()
        };
        filter.categories.toggle("Food");
        filter.toggle_store_type(StoreType::Restaurant);

        let names: Vec<&str> = filter
            .apply(fixtures::products())
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Jollof Rice Party Pack", "Suya Special (10 sticks)", "Shawarma Special Combo"]
        );

        filter.search = "SUYA".to_string();
        assert_eq!(filter.apply(fixtures::products()).len(), 1);
    }

    #[test]
    fn test_price_filter_returns_subset() {
        let filter = ProductFilter {
            price: PriceRange::new(5_000u64, 20_000u64),
            ..ProductFilter::default()
        };
        let shown = filter.apply(fixtures::products());
        assert!(!shown.is_empty());
        assert!(shown.len() < fixtures::products().len());
        assert!(shown.iter().all(|p| filter.price.contains(p.price)));
    }
}
