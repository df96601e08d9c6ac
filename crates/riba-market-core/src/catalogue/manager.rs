use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::{CatalogueError, ValidationError};
use super::items::{item_stats, ItemManager};
use crate::cache::{CacheKey, Collection, LocalCache};
use crate::models::{
    Catalogue, CatalogueCategory, CatalogueDraft, CatalogueId, CatalogueItem, CatalogueItemId,
    CatalogueStats, Customization,
};
use crate::utils::contains_ignore_case;

/// Suffix appended to the name of a duplicated catalogue.
pub const COPY_SUFFIX: &str = " (Copy)";

/// Path of the public page of a catalogue.
pub fn share_path(id: &CatalogueId) -> String {
    format!("/catalogue/{}", id)
}

/// Absolute share link under `base_url`.
pub fn share_url(base_url: &str, id: &CatalogueId) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), share_path(id))
}

fn validate(draft: &CatalogueDraft) -> Result<(String, CatalogueCategory), ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    let category = draft.category.ok_or(ValidationError::MissingCategory)?;
    Ok((name.to_string(), category))
}

/// The seller's catalogues and the current selection.
///
/// Owns the `riba_seller_catalogues` collection. Items live under one key per
/// catalogue and are handled by [`ItemManager`].
#[derive(Debug)]
pub struct CatalogueManager {
    cache: LocalCache,
    key: CacheKey,
    catalogues: Collection<Catalogue>,
    selected: Option<CatalogueId>,
}

impl CatalogueManager {
    /// Load the catalogue list, migrating the legacy `riba_seller_stores`
    /// records the first time the new key is missing.
    pub fn open(cache: LocalCache) -> Self {
        let key = CacheKey::catalogues();
        let catalogues = cache.read(&key, Collection::new());
        let mut manager = Self {
            cache,
            key,
            catalogues,
            selected: None,
        };
        manager.migrate_legacy_stores();
        manager
    }

    fn migrate_legacy_stores(&mut self) {
        if self.cache.contains(&self.key) {
            return;
        }
        let legacy_key = CacheKey::legacy_stores();
        let legacy: Collection<Catalogue> = self.cache.read(&legacy_key, Collection::new());
        if legacy.is_empty() {
            return;
        }

        info!(count = legacy.len(), "Migrating legacy store records to catalogues");
        self.catalogues = legacy;
        if let Err(e) = self.persist() {
            // Key stays dirty; the next flush retries it.
            warn!(error = %e, "Failed to persist migrated catalogues");
        }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    fn persist(&self) -> Result<(), CatalogueError> {
        self.cache.write(&self.key, &self.catalogues)?;
        Ok(())
    }

    // ===== Queries =====

    pub fn catalogues(&self) -> &[Catalogue] {
        self.catalogues.as_slice()
    }

    pub fn get(&self, id: &CatalogueId) -> Option<&Catalogue> {
        self.catalogues.get(id)
    }

    pub fn len(&self) -> usize {
        self.catalogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogues.is_empty()
    }

    /// Catalogues whose name or category label contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Catalogue> {
        let query = query.trim().to_lowercase();
        self.catalogues
            .iter()
            .filter(|c| {
                contains_ignore_case(&c.name, &query) || contains_ignore_case(c.category.label(), &query)
            })
            .collect()
    }

    fn stored_items(&self, id: &CatalogueId) -> Vec<CatalogueItem> {
        self.cache.read(&CacheKey::catalogue_items(id), Vec::new())
    }

    /// Item counts of one catalogue. Unknown catalogues count as empty.
    pub fn stats(&self, id: &CatalogueId) -> CatalogueStats {
        item_stats(&self.stored_items(id))
    }

    pub fn all_stats(&self) -> Vec<(&Catalogue, CatalogueStats)> {
        self.catalogues
            .iter()
            .map(|c| (c, self.stats(&c.id)))
            .collect()
    }

    /// Item manager for a known catalogue.
    pub fn items(&self, id: &CatalogueId) -> Option<ItemManager> {
        self.catalogues
            .contains(id)
            .then(|| ItemManager::open(self.cache.clone(), id.clone()))
    }

    pub fn share_link(&self, id: &CatalogueId, base_url: &str) -> Option<String> {
        self.catalogues.contains(id).then(|| share_url(base_url, id))
    }

    // ===== Selection =====

    /// Select a catalogue for item management. Unknown ids leave the selection as is.
    pub fn select(&mut self, id: &CatalogueId) -> bool {
        if !self.catalogues.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Catalogue> {
        self.selected.as_ref().and_then(|id| self.catalogues.get(id))
    }

    // ===== Mutations =====

    /// Add a catalogue and select it.
    pub fn create(&mut self, draft: CatalogueDraft) -> Result<Catalogue, CatalogueError> {
        let (name, category) = validate(&draft)?;
        let catalogue = Catalogue {
            id: CatalogueId::generate(),
            name,
            category,
            description: draft.description,
            created_at: Utc::now(),
            banner_color: None,
            accent_color: None,
            welcome_message: None,
            is_public: None,
        };
        self.catalogues.push(catalogue.clone());
        self.selected = Some(catalogue.id.clone());
        self.persist()?;
        info!(id = %catalogue.id, name = %catalogue.name, "Created catalogue");
        Ok(catalogue)
    }

    /// Update name, category and description. Returns `false` for an unknown id.
    pub fn edit(&mut self, id: &CatalogueId, draft: CatalogueDraft) -> Result<bool, CatalogueError> {
        let (name, category) = validate(&draft)?;
        let found = self.catalogues.update(id, |c| {
            c.name = name;
            c.category = category;
            c.description = draft.description;
        });
        if !found {
            debug!(id = %id, "Edit ignored, catalogue not found");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Apply presentation settings. `None` fields keep their current value.
    pub fn customize(&mut self, id: &CatalogueId, changes: Customization) -> Result<bool, CatalogueError> {
        let found = self.catalogues.update(id, |c| {
            if changes.banner_color.is_some() {
                c.banner_color = changes.banner_color;
            }
            if changes.accent_color.is_some() {
                c.accent_color = changes.accent_color;
            }
            if changes.welcome_message.is_some() {
                c.welcome_message = changes.welcome_message;
            }
            if changes.is_public.is_some() {
                c.is_public = changes.is_public;
            }
        });
        if !found {
            debug!(id = %id, "Customize ignored, catalogue not found");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Flip public visibility. Returns the new visibility.
    pub fn toggle_visibility(&mut self, id: &CatalogueId) -> Result<Option<bool>, CatalogueError> {
        let mut visible = None;
        self.catalogues.update(id, |c| {
            let next = !c.is_visible();
            c.is_public = Some(next);
            visible = Some(next);
        });
        if visible.is_none() {
            debug!(id = %id, "Visibility toggle ignored, catalogue not found");
            return Ok(None);
        }
        self.persist()?;
        Ok(visible)
    }

    /// Copy a catalogue and its items under fresh ids.
    ///
    /// The copy gets a new creation time and the `" (Copy)"` suffix; copied
    /// items keep every field except their id.
    pub fn duplicate(&mut self, id: &CatalogueId) -> Result<Option<Catalogue>, CatalogueError> {
        let Some(source) = self.catalogues.get(id).cloned() else {
            debug!(id = %id, "Duplicate ignored, catalogue not found");
            return Ok(None);
        };

        let copy = Catalogue {
            id: CatalogueId::generate(),
            name: format!("{}{}", source.name, COPY_SUFFIX),
            created_at: Utc::now(),
            ..source
        };
        let items: Collection<CatalogueItem> = self
            .stored_items(id)
            .into_iter()
            .map(|item| CatalogueItem {
                id: CatalogueItemId::generate(),
                ..item
            })
            .collect();

        self.catalogues.push(copy.clone());
        let list_result = self.persist();
        let items_result = if items.is_empty() {
            Ok(())
        } else {
            self.cache
                .write(&CacheKey::catalogue_items(&copy.id), &items)
                .map_err(CatalogueError::from)
        };
        list_result?;
        items_result?;

        info!(source = %id, id = %copy.id, items = items.len(), "Duplicated catalogue");
        Ok(Some(copy))
    }

    /// Remove a catalogue together with its items and any selection of it.
    pub fn delete(&mut self, id: &CatalogueId) -> Result<bool, CatalogueError> {
        if self.catalogues.remove(id).is_none() {
            debug!(id = %id, "Delete ignored, catalogue not found");
            return Ok(false);
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }

        let list_result = self.persist();
        let items_result = self
            .cache
            .clear(&CacheKey::catalogue_items(id))
            .map_err(CatalogueError::from);
        list_result?;
        items_result?;

        info!(id = %id, "Deleted catalogue");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryBackend;
    use crate::models::{ItemDraft, ItemStatus};

    fn summer(manager: &mut CatalogueManager) -> Catalogue {
        manager
            .create(CatalogueDraft::new("Summer", CatalogueCategory::Fashion))
            .unwrap()
    }

    #[test]
    fn test_create_persists_and_validates() {
        let cache = LocalCache::in_memory();
        let mut manager = CatalogueManager::open(cache.clone());
        let before = Utc::now();
        let created = summer(&mut manager);
        assert!(created.created_at >= before);
        assert!(created.is_visible());
        assert_eq!(manager.selected(), Some(&created));

        let reopened = CatalogueManager::open(cache.clone());
        assert_eq!(reopened.catalogues(), &[created.clone()]);

        let second = summer(&mut manager);
        assert_ne!(second.id, created.id);
        assert!(second.created_at >= created.created_at);
        manager.delete(&second.id).unwrap();

        let err = manager
            .create(CatalogueDraft::new("   ", CatalogueCategory::Fashion))
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Validation(ValidationError::MissingName)));

        let no_category = CatalogueDraft {
            name: "Winter".to_string(),
            ..CatalogueDraft::default()
        };
        let err = manager.create(no_category).unwrap_err();
        assert!(matches!(err, CatalogueError::Validation(ValidationError::MissingCategory)));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_edit_unknown_id_is_no_op() {
        let mut manager = CatalogueManager::open(LocalCache::in_memory());
        let created = summer(&mut manager);
        let draft = CatalogueDraft::new("Autumn", CatalogueCategory::Products);

        assert!(!manager.edit(&CatalogueId::new("ghost"), draft.clone()).unwrap());
        assert!(manager.edit(&created.id, draft).unwrap());
        let edited = manager.get(&created.id).unwrap();
        assert_eq!(edited.name, "Autumn");
        assert_eq!(edited.category, CatalogueCategory::Products);
        assert_eq!(edited.created_at, created.created_at);
    }

    #[test]
    fn test_customize_keeps_unset_fields() {
        let mut manager = CatalogueManager::open(LocalCache::in_memory());
        let created = summer(&mut manager);
        manager
            .customize(
                &created.id,
                Customization {
                    banner_color: Some("#111".to_string()),
                    welcome_message: Some("Hi".to_string()),
                    ..Customization::default()
                },
            )
            .unwrap();
        manager
            .customize(
                &created.id,
                Customization {
                    accent_color: Some("#222".to_string()),
                    ..Customization::default()
                },
            )
            .unwrap();

        let c = manager.get(&created.id).unwrap();
        assert_eq!(c.banner_color.as_deref(), Some("#111"));
        assert_eq!(c.accent_color.as_deref(), Some("#222"));
        assert_eq!(c.welcome_message.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_toggle_visibility_from_unset() {
        let mut manager = CatalogueManager::open(LocalCache::in_memory());
        let created = summer(&mut manager);
        assert_eq!(manager.toggle_visibility(&created.id).unwrap(), Some(false));
        assert!(!manager.get(&created.id).unwrap().is_visible());
        assert_eq!(manager.toggle_visibility(&created.id).unwrap(), Some(true));
        assert_eq!(manager.toggle_visibility(&CatalogueId::new("x")).unwrap(), None);
    }

    #[test]
    fn test_duplicate_copies_items_with_new_ids() {
        let cache = LocalCache::in_memory();
        let mut manager = CatalogueManager::open(cache.clone());
        let source = summer(&mut manager);
        let mut items = manager.items(&source.id).unwrap();
        items.create(ItemDraft::new("Dress", 5000u64)).unwrap();
        items
            .create(ItemDraft::new("Hat", 1500u64).with_status(ItemStatus::Published))
            .unwrap();

        let copy = manager.duplicate(&source.id).unwrap().unwrap();
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.name, "Summer (Copy)");
        assert_eq!(copy.category, source.category);

        let original: Vec<CatalogueItem> = cache.read(&CacheKey::catalogue_items(&source.id), Vec::new());
        let copied: Vec<CatalogueItem> = cache.read(&CacheKey::catalogue_items(&copy.id), Vec::new());
        assert_eq!(copied.len(), original.len());
        for (a, b) in original.iter().zip(&copied) {
            assert_ne!(a.id, b.id);
            assert_eq!(CatalogueItem { id: b.id.clone(), ..a.clone() }, *b);
        }
        assert_eq!(manager.stats(&copy.id), CatalogueStats { total: 2, published: 1, draft: 1 });
    }

    #[test]
    fn test_delete_clears_items_and_selection() {
        let backend = MemoryBackend::new();
        let mut manager = CatalogueManager::open(LocalCache::open(backend.clone()));
        let created = summer(&mut manager);
        manager
            .items(&created.id)
            .unwrap()
            .create(ItemDraft::new("Dress", 5000u64))
            .unwrap();
        assert!(manager.select(&created.id));

        let items_key = format!("riba_catalogue_{}", created.id);
        assert!(backend.raw(&items_key).is_some());

        assert!(manager.delete(&created.id).unwrap());
        assert!(manager.selected().is_none());
        assert!(backend.raw(&items_key).is_none());
        assert!(manager.is_empty());
        assert!(!manager.delete(&created.id).unwrap());
    }

    #[test]
    fn test_select_unknown_keeps_selection() {
        let mut manager = CatalogueManager::open(LocalCache::in_memory());
        let created = summer(&mut manager);
        assert!(manager.select(&created.id));
        assert!(!manager.select(&CatalogueId::new("ghost")));
        assert_eq!(manager.selected().map(|c| &c.id), Some(&created.id));
        manager.clear_selection();
        assert!(manager.selected().is_none());
    }

    #[test]
    fn test_search_matches_name_and_category_label() {
        let mut manager = CatalogueManager::open(LocalCache::in_memory());
        summer(&mut manager);
        manager
            .create(CatalogueDraft::new("Lunch Menu", CatalogueCategory::FoodDrinks))
            .unwrap();

        assert_eq!(manager.search("summ").len(), 1);
        assert_eq!(manager.search("FOOD &").len(), 1);
        assert_eq!(manager.search("").len(), 2);
        assert!(manager.search("garden").is_empty());
    }

    #[test]
    fn test_share_links() {
        let mut manager = CatalogueManager::open(LocalCache::in_memory());
        let created = summer(&mut manager);
        assert_eq!(share_path(&created.id), format!("/catalogue/{}", created.id));
        assert_eq!(
            manager.share_link(&created.id, "https://riba.market/").unwrap(),
            format!("https://riba.market/catalogue/{}", created.id)
        );
        assert!(manager.share_link(&CatalogueId::new("x"), "https://riba.market").is_none());
    }

    #[test]
    fn test_legacy_stores_migrate_once() {
        let backend = MemoryBackend::new();
        backend.insert_raw(
            "riba_seller_stores",
            r#"[{"id":"s1","name":"Old Shop","category":"products","description":"","createdAt":"2024-11-02T10:00:00Z"}]"#,
        );
        let manager = CatalogueManager::open(LocalCache::open(backend.clone()));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.catalogues()[0].name, "Old Shop");
        assert!(backend.raw("riba_seller_catalogues").is_some());

        let cache = LocalCache::open(backend.clone());
        let mut reopened = CatalogueManager::open(cache);
        let id = CatalogueId::new("s1");
        assert!(reopened.delete(&id).unwrap());
        let again = CatalogueManager::open(LocalCache::open(backend));
        assert!(again.is_empty());
    }
}
