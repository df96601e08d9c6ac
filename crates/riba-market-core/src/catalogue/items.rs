use chrono::Utc;
use tracing::{debug, info};

use super::error::{CatalogueError, ValidationError};
use crate::cache::{CacheKey, Collection, LocalCache};
use crate::models::{
    Catalogue, CatalogueId, CatalogueItem, CatalogueItemId, CatalogueStats, ItemDraft, ItemStatus,
};

/// Which collection an item belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemsOwner {
    Catalogue(CatalogueId),
    /// Items created before catalogues existed.
    Unscoped,
}

impl ItemsOwner {
    pub fn cache_key(&self) -> CacheKey {
        match self {
            ItemsOwner::Catalogue(id) => CacheKey::catalogue_items(id),
            ItemsOwner::Unscoped => CacheKey::unscoped_items(),
        }
    }
}

impl From<CatalogueId> for ItemsOwner {
    fn from(id: CatalogueId) -> Self {
        ItemsOwner::Catalogue(id)
    }
}

/// Count items by status.
pub fn item_stats<'a>(items: impl IntoIterator<Item = &'a CatalogueItem>) -> CatalogueStats {
    items
        .into_iter()
        .fold(CatalogueStats::default(), |mut stats, item| {
            stats.total += 1;
            match item.status {
                ItemStatus::Published => stats.published += 1,
                ItemStatus::Draft => stats.draft += 1,
            }
            stats
        })
}

fn validate(name: &str, price: u64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingItemName);
    }
    if price == 0 {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(())
}

/// CRUD over the items of one owner.
///
/// The collection is loaded once when the manager opens and every mutation
/// writes the whole collection back through the cache. Once the owning
/// catalogue is deleted, mutations write nothing.
#[derive(Debug)]
pub struct ItemManager {
    cache: LocalCache,
    owner: ItemsOwner,
    key: CacheKey,
    items: Collection<CatalogueItem>,
}

impl ItemManager {
    pub fn open(cache: LocalCache, owner: impl Into<ItemsOwner>) -> Self {
        let owner = owner.into();
        let key = owner.cache_key();
        let items = cache.read(&key, Collection::new());
        debug!(key = %key, count = items.len(), "Opened item collection");
        Self {
            cache,
            owner,
            key,
            items,
        }
    }

    pub fn owner(&self) -> &ItemsOwner {
        &self.owner
    }

    pub fn items(&self) -> &[CatalogueItem] {
        self.items.as_slice()
    }

    pub fn get(&self, id: &CatalogueItemId) -> Option<&CatalogueItem> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn published(&self) -> Vec<&CatalogueItem> {
        self.items.iter().filter(|i| i.is_published()).collect()
    }

    pub fn stats(&self) -> CatalogueStats {
        item_stats(&self.items)
    }

    /// False once the owning catalogue has been deleted. Unscoped items always have an owner.
    fn owner_exists(&self) -> bool {
        match &self.owner {
            ItemsOwner::Catalogue(id) => self
                .cache
                .read::<Vec<Catalogue>>(&CacheKey::catalogues(), Vec::new())
                .iter()
                .any(|c| &c.id == id),
            ItemsOwner::Unscoped => true,
        }
    }

    fn persist(&self) -> Result<(), CatalogueError> {
        self.cache.write(&self.key, &self.items)?;
        Ok(())
    }

    /// Add an item with a fresh id and timestamp.
    pub fn create(&mut self, draft: ItemDraft) -> Result<CatalogueItem, CatalogueError> {
        validate(&draft.name, draft.price.amount())?;
        if let ItemsOwner::Catalogue(id) = &self.owner {
            if !self.owner_exists() {
                debug!(key = %self.key, "Create refused, catalogue was deleted");
                return Err(CatalogueError::CatalogueNotFound(id.clone()));
            }
        }

        let item = CatalogueItem {
            id: CatalogueItemId::generate(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            price: draft.price,
            category: draft.category,
            image: draft.image,
            status: draft.status,
            created_at: Utc::now(),
        };
        self.items.push(item.clone());
        self.persist()?;
        info!(key = %self.key, id = %item.id, "Created catalogue item");
        Ok(item)
    }

    /// Replace the stored record with the same id. Unknown ids change nothing.
    pub fn edit(&mut self, mut item: CatalogueItem) -> Result<bool, CatalogueError> {
        validate(&item.name, item.price.amount())?;
        if !self.owner_exists() {
            debug!(key = %self.key, id = %item.id, "Edit ignored, catalogue was deleted");
            return Ok(false);
        }

        item.name = item.name.trim().to_string();
        let id = item.id.clone();
        if self.items.replace(item).is_none() {
            debug!(key = %self.key, id = %id, "Edit ignored, item not found");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn delete(&mut self, id: &CatalogueItemId) -> Result<bool, CatalogueError> {
        if !self.owner_exists() {
            debug!(key = %self.key, id = %id, "Delete ignored, catalogue was deleted");
            return Ok(false);
        }
        if self.items.remove(id).is_none() {
            debug!(key = %self.key, id = %id, "Delete ignored, item not found");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Flip draft/published. Returns the new status, `None` for an unknown id.
    pub fn toggle_status(&mut self, id: &CatalogueItemId) -> Result<Option<ItemStatus>, CatalogueError> {
        if !self.owner_exists() {
            debug!(key = %self.key, id = %id, "Toggle ignored, catalogue was deleted");
            return Ok(None);
        }
        let mut status = None;
        self.items.update(id, |item| {
            item.status = item.status.toggled();
            status = Some(item.status);
        });
        if status.is_none() {
            debug!(key = %self.key, id = %id, "Toggle ignored, item not found");
            return Ok(None);
        }
        self.persist()?;
        Ok(status)
    }

    /// Reload from the cache, dropping any view of the collection this manager held.
    pub fn reload(&mut self) {
        self.items = self.cache.read(&self.key, Collection::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryBackend;
    use crate::catalogue::CatalogueManager;
    use crate::models::{CatalogueCategory, CatalogueDraft, Price};

    fn summer(cache: &LocalCache) -> CatalogueId {
        CatalogueManager::open(cache.clone())
            .create(CatalogueDraft::new("Summer", CatalogueCategory::Fashion))
            .unwrap()
            .id
    }

    fn manager() -> (LocalCache, ItemManager) {
        let cache = LocalCache::in_memory();
        let items = ItemManager::open(cache.clone(), summer(&cache));
        (cache, items)
    }

    #[test]
    fn test_create_assigns_id_and_persists() {
        let (cache, mut items) = manager();
        let dress = items.create(ItemDraft::new("Dress", 5000u64)).unwrap();
        assert_eq!(dress.status, ItemStatus::Draft);
        assert!(!dress.id.as_str().is_empty());

        let stored: Vec<CatalogueItem> = cache.read(&items.owner().cache_key(), Vec::new());
        assert_eq!(stored, vec![dress]);
    }

    #[test]
    fn test_create_validates_name_and_price() {
        let (_cache, mut items) = manager();
        let err = items.create(ItemDraft::new("  ", 100u64)).unwrap_err();
        assert!(matches!(err, CatalogueError::Validation(ValidationError::MissingItemName)));
        let err = items.create(ItemDraft::new("Dress", 0u64)).unwrap_err();
        assert!(matches!(err, CatalogueError::Validation(ValidationError::InvalidPrice)));
        assert!(items.is_empty());
    }

    #[test]
    fn test_edit_replaces_whole_record() {
        let (_cache, mut items) = manager();
        let mut dress = items.create(ItemDraft::new("Dress", 5000u64)).unwrap();
        dress.name = "Maxi Dress".to_string();
        dress.price = Price::new(6500);
        assert!(items.edit(dress.clone()).unwrap());
        assert_eq!(items.get(&dress.id), Some(&dress));
    }

    #[test]
    fn test_edit_trims_name() {
        let (_cache, mut items) = manager();
        let mut dress = items.create(ItemDraft::new("Dress", 5000u64)).unwrap();
        dress.name = "  Maxi Dress ".to_string();
        assert!(items.edit(dress.clone()).unwrap());
        assert_eq!(items.get(&dress.id).unwrap().name, "Maxi Dress");
    }

    #[test]
    fn test_stale_ids_are_no_ops() {
        let (_cache, mut items) = manager();
        let ghost = CatalogueItemId::new("ghost");
        assert!(!items.delete(&ghost).unwrap());
        assert_eq!(items.toggle_status(&ghost).unwrap(), None);

        let mut stray = items.create(ItemDraft::new("Dress", 5000u64)).unwrap();
        stray.id = ghost;
        assert!(!items.edit(stray).unwrap());
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_status() {
        let (_cache, mut items) = manager();
        let dress = items.create(ItemDraft::new("Dress", 5000u64)).unwrap();
        assert_eq!(items.toggle_status(&dress.id).unwrap(), Some(ItemStatus::Published));
        assert_eq!(items.published().len(), 1);
        assert_eq!(items.toggle_status(&dress.id).unwrap(), Some(ItemStatus::Draft));
        assert!(items.published().is_empty());
    }

    #[test]
    fn test_stats_counts_by_status() {
        let (_cache, mut items) = manager();
        items.create(ItemDraft::new("A", 1u64)).unwrap();
        items.create(ItemDraft::new("B", 1u64).with_status(ItemStatus::Published)).unwrap();
        items.create(ItemDraft::new("C", 1u64).with_status(ItemStatus::Published)).unwrap();
        assert_eq!(
            items.stats(),
            CatalogueStats { total: 3, published: 2, draft: 1 }
        );
    }

    #[test]
    fn test_unscoped_owner_uses_legacy_key() {
        let backend = MemoryBackend::new();
        let cache = LocalCache::open(backend.clone());
        let mut items = ItemManager::open(cache, ItemsOwner::Unscoped);
        items.create(ItemDraft::new("Old", 10u64)).unwrap();
        assert!(backend.raw("riba_catalogue").is_some());
    }

    #[test]
    fn test_persist_failure_is_reported_but_kept_in_memory() {
        let backend = MemoryBackend::new();
        let cache = LocalCache::open(backend.clone());
        let mut items = ItemManager::open(cache.clone(), summer(&cache));
        backend.set_quota(Some(16));

        let err = items.create(ItemDraft::new("Dress", 5000u64)).unwrap_err();
        assert!(matches!(err, CatalogueError::Cache(ref e) if e.is_persist_failure()));
        assert_eq!(items.len(), 1);
        assert_eq!(cache.dirty_keys().len(), 1);
    }

    #[test]
    fn test_deleted_catalogue_takes_no_writes() {
        let backend = MemoryBackend::new();
        let cache = LocalCache::open(backend.clone());
        let mut catalogues = CatalogueManager::open(cache.clone());
        let summer = catalogues
            .create(CatalogueDraft::new("Summer", CatalogueCategory::Fashion))
            .unwrap();
        let mut items = catalogues.items(&summer.id).unwrap();
        let dress = items.create(ItemDraft::new("Dress", 5000u64)).unwrap();

        catalogues.delete(&summer.id).unwrap();
        assert_eq!(items.toggle_status(&dress.id).unwrap(), None);
        assert!(!items.edit(dress.clone()).unwrap());
        assert!(!items.delete(&dress.id).unwrap());
        let err = items.create(ItemDraft::new("Hat", 1500u64)).unwrap_err();
        assert!(matches!(err, CatalogueError::CatalogueNotFound(ref id) if id == &summer.id));

        let key = CacheKey::catalogue_items(&summer.id);
        assert!(!cache.contains(&key));
        assert!(backend.raw(key.as_str()).is_none());
    }
}
