use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::manager::{share_path, CatalogueManager};
use super::profile::SellerProfileStore;
use crate::cache::CacheKey;
use crate::models::{Catalogue, CatalogueId, CatalogueItem, SellerProfile};
use crate::utils::{cmp_ignore_case, contains_ignore_case};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublicViewError {
    #[error("Catalogue not found: {0}")]
    NotFound(CatalogueId),

    #[error("Catalogue is not available: {0}")]
    Unavailable(CatalogueId),
}

/// Sort order of the public item grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemSort {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl ItemSort {
    pub const ALL: [ItemSort; 5] = [
        ItemSort::NameAsc,
        ItemSort::NameDesc,
        ItemSort::PriceAsc,
        ItemSort::PriceDesc,
        ItemSort::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSort::NameAsc => "name-asc",
            ItemSort::NameDesc => "name-desc",
            ItemSort::PriceAsc => "price-asc",
            ItemSort::PriceDesc => "price-desc",
            ItemSort::Newest => "newest",
        }
    }

    pub fn sort(&self, items: &mut [CatalogueItem]) {
        match self {
            ItemSort::NameAsc => items.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name)),
            ItemSort::NameDesc => items.sort_by(|a, b| cmp_ignore_case(&b.name, &a.name)),
            ItemSort::PriceAsc => items.sort_by_key(|i| i.price),
            ItemSort::PriceDesc => items.sort_by(|a, b| b.price.cmp(&a.price)),
            ItemSort::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

impl fmt::Display for ItemSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == wanted)
            .ok_or_else(|| format!("unknown sort '{}'", s))
    }
}

/// Search and ordering applied to the published items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    pub search: String,
    pub sort: ItemSort,
}

impl ItemQuery {
    pub fn new(search: impl Into<String>, sort: ItemSort) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }

    fn matches(&self, item: &CatalogueItem, query: &str) -> bool {
        contains_ignore_case(&item.name, query)
            || contains_ignore_case(&item.category, query)
            || contains_ignore_case(&item.description, query)
    }

    /// Keep items matching the search text, then sort them.
    pub fn apply(&self, items: Vec<CatalogueItem>) -> Vec<CatalogueItem> {
        let query = self.search.trim().to_lowercase();
        let mut items: Vec<CatalogueItem> = items
            .into_iter()
            .filter(|item| self.matches(item, &query))
            .collect();
        self.sort.sort(&mut items);
        items
    }
}

/// What a visitor sees on a shared catalogue link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCatalogueView {
    pub catalogue: Catalogue,
    pub seller: SellerProfile,
    /// Published items after search and sort.
    pub items: Vec<CatalogueItem>,
    /// Published items before search.
    pub published_count: usize,
    pub share_path: String,
}

/// Build the public page of a catalogue.
///
/// Only published items are ever shown. A catalogue explicitly marked as
/// not public is [`PublicViewError::Unavailable`].
pub fn public_view(
    catalogues: &CatalogueManager,
    id: &CatalogueId,
    query: &ItemQuery,
) -> Result<PublicCatalogueView, PublicViewError> {
    let catalogue = catalogues
        .get(id)
        .cloned()
        .ok_or_else(|| PublicViewError::NotFound(id.clone()))?;
    if !catalogue.is_visible() {
        debug!(id = %id, "Public view refused for hidden catalogue");
        return Err(PublicViewError::Unavailable(id.clone()));
    }

    let cache = catalogues.cache();
    let published: Vec<CatalogueItem> = cache
        .read::<Vec<CatalogueItem>>(&CacheKey::catalogue_items(id), Vec::new())
        .into_iter()
        .filter(CatalogueItem::is_published)
        .collect();
    let published_count = published.len();
    let seller = SellerProfileStore::open(cache.clone()).profile().clone();

    Ok(PublicCatalogueView {
        share_path: share_path(id),
        items: query.apply(published),
        published_count,
        seller,
        catalogue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LocalCache;
    use crate::models::{CatalogueCategory, CatalogueDraft, ItemDraft, ItemStatus, Price};

    fn item(name: &str, price: u64, secs: i64) -> CatalogueItem {
        CatalogueItem {
            id: name.into(),
            name: name.to_string(),
            description: String::new(),
            price: Price::new(price),
            category: String::new(),
            image: String::new(),
            status: ItemStatus::Published,
            created_at: chrono::DateTime::from_timestamp(secs, 0).unwrap(),
        }
    }

    fn names(items: &[CatalogueItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_sorts() {
        let items = vec![item("banana", 300, 2), item("Apple", 100, 3), item("cherry", 200, 1)];

        let by = |sort: ItemSort| ItemQuery::new("", sort).apply(items.clone());
        assert_eq!(names(&by(ItemSort::NameAsc)), ["Apple", "banana", "cherry"]);
        assert_eq!(names(&by(ItemSort::NameDesc)), ["cherry", "banana", "Apple"]);
        assert_eq!(names(&by(ItemSort::PriceAsc)), ["Apple", "cherry", "banana"]);
        assert_eq!(names(&by(ItemSort::PriceDesc)), ["banana", "cherry", "Apple"]);
        assert_eq!(names(&by(ItemSort::Newest)), ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_search_covers_category_and_description() {
        let mut hat = item("Hat", 100, 1);
        hat.category = "Accessories".to_string();
        let mut scarf = item("Scarf", 100, 1);
        scarf.description = "Warm wool".to_string();

        let items = vec![hat, scarf, item("Dress", 100, 1)];
        assert_eq!(names(&ItemQuery::new("ACCESS", ItemSort::NameAsc).apply(items.clone())), ["Hat"]);
        assert_eq!(names(&ItemQuery::new("wool", ItemSort::NameAsc).apply(items.clone())), ["Scarf"]);
        assert_eq!(ItemQuery::default().apply(items).len(), 3);
    }

    #[test]
    fn test_sort_parses() {
        assert_eq!("price-desc".parse::<ItemSort>().unwrap(), ItemSort::PriceDesc);
        assert_eq!("NEWEST".parse::<ItemSort>().unwrap(), ItemSort::Newest);
        assert!("rating".parse::<ItemSort>().is_err());
    }

    #[test]
    fn test_public_view_shows_only_published() {
        let mut manager = CatalogueManager::open(LocalCache::in_memory());
        let summer = manager
            .create(CatalogueDraft::new("Summer", CatalogueCategory::Fashion))
            .unwrap();
        let mut items = manager.items(&summer.id).unwrap();
        let dress = items.create(ItemDraft::new("Dress", 5000u64)).unwrap();
        items
            .create(ItemDraft::new("Hat", 1500u64).with_status(ItemStatus::Published))
            .unwrap();

        let view = public_view(&manager, &summer.id, &ItemQuery::default()).unwrap();
        assert_eq!(names(&view.items), ["Hat"]);
        assert_eq!(view.published_count, 1);
        assert_eq!(view.seller, SellerProfile::default());

        items.toggle_status(&dress.id).unwrap();
        let view = public_view(&manager, &summer.id, &ItemQuery::default()).unwrap();
        assert_eq!(names(&view.items), ["Dress", "Hat"]);
    }

    #[test]
    fn test_public_view_errors() {
        let mut manager = CatalogueManager::open(LocalCache::in_memory());
        let ghost = CatalogueId::new("ghost");
        assert_eq!(
            public_view(&manager, &ghost, &ItemQuery::default()).unwrap_err(),
            PublicViewError::NotFound(ghost)
        );

        let summer = manager
            .create(CatalogueDraft::new("Summer", CatalogueCategory::Fashion))
            .unwrap();
        manager.toggle_visibility(&summer.id).unwrap();
        assert_eq!(
            public_view(&manager, &summer.id, &ItemQuery::default()).unwrap_err(),
            PublicViewError::Unavailable(summer.id.clone())
        );
    }
}
