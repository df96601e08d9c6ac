use crate::fixtures;
use crate::models::{CatalogueItem, Price, Product, ProductId};

pub fn product(id: &ProductId) -> Option<&'static Product> {
    fixtures::products().iter().find(|p| &p.id == id)
}

/// Up to `limit` other products in the same category, in fixture order.
pub fn related(product: &Product, limit: usize) -> Vec<&'static Product> {
    fixtures::products()
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .take(limit)
        .collect()
}

/// One entry on a store page.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<'a> {
    /// Published item from the seller's catalogue.
    Item(&'a CatalogueItem),
    Product(&'static Product),
}

impl Listing<'_> {
    pub fn name(&self) -> &str {
        match self {
            Listing::Item(item) => &item.name,
            Listing::Product(product) => &product.name,
        }
    }

    pub fn price(&self) -> Price {
        match self {
            Listing::Item(item) => item.price,
            Listing::Product(product) => product.price,
        }
    }

    pub fn image(&self) -> &str {
        match self {
            Listing::Item(item) => &item.image,
            Listing::Product(product) => &product.image,
        }
    }
}

/// Store page contents: published catalogue items first, then the store's
/// fixture products.
pub fn store_listings<'a>(store_name: &str, items: &'a [CatalogueItem]) -> Vec<Listing<'a>> {
    items
        .iter()
        .filter(|item| item.is_published())
        .map(Listing::Item)
        .chain(
            fixtures::products()
                .iter()
                .filter(|p| p.store_name == store_name)
                .map(Listing::Product),
        )
        .collect()
}
