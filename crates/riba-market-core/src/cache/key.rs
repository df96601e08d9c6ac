use std::fmt;

use crate::models::CatalogueId;

/// Key of the seller's catalogue collection.
const CATALOGUES_KEY: &str = "riba_seller_catalogues";

/// Older builds stored catalogues under the "stores" name.
const LEGACY_STORES_KEY: &str = "riba_seller_stores";

/// Prefix of a catalogue-scoped item collection key.
const CATALOGUE_ITEMS_PREFIX: &str = "riba_catalogue_";

/// Item collection used before catalogues existed.
const UNSCOPED_ITEMS_KEY: &str = "riba_catalogue";

const SELLER_PROFILE_KEY: &str = "riba_seller_profile";

/// Name under which one value lives in the local cache.
///
/// Domain keys are only built through the constructors below so the
/// catalogue → items relation is derived in a single place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Arbitrary key for values outside the marketplace model.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn catalogues() -> Self {
        Self::new(CATALOGUES_KEY)
    }

    pub fn legacy_stores() -> Self {
        Self::new(LEGACY_STORES_KEY)
    }

    pub fn catalogue_items(catalogue_id: &CatalogueId) -> Self {
        Self(format!("{}{}", CATALOGUE_ITEMS_PREFIX, catalogue_id))
    }

    pub fn unscoped_items() -> Self {
        Self::new(UNSCOPED_ITEMS_KEY)
    }

    pub fn seller_profile() -> Self {
        Self::new(SELLER_PROFILE_KEY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
