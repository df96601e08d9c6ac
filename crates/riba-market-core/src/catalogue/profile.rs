use tracing::info;

use super::error::{CatalogueError, ValidationError};
use crate::cache::{CacheKey, LocalCache};
use crate::models::SellerProfile;

/// Largest logo accepted, in bytes.
pub const MAX_LOGO_BYTES: u64 = 2 * 1024 * 1024;

pub fn check_logo_size(size: u64) -> Result<(), ValidationError> {
    if size > MAX_LOGO_BYTES {
        return Err(ValidationError::LogoTooLarge {
            size,
            limit: MAX_LOGO_BYTES,
        });
    }
    Ok(())
}

/// The seller profile stored under `riba_seller_profile`.
///
/// Reads fall back to the default profile until one has been saved.
#[derive(Debug)]
pub struct SellerProfileStore {
    cache: LocalCache,
    profile: SellerProfile,
}

impl SellerProfileStore {
    pub fn open(cache: LocalCache) -> Self {
        let profile = cache.read(&CacheKey::seller_profile(), SellerProfile::default());
        Self { cache, profile }
    }

    pub fn profile(&self) -> &SellerProfile {
        &self.profile
    }

    pub fn save(&mut self, profile: SellerProfile) -> Result<(), CatalogueError> {
        self.profile = profile;
        self.cache.write(&CacheKey::seller_profile(), &self.profile)?;
        info!(business = %self.profile.business_name, "Saved seller profile");
        Ok(())
    }

    /// Replace the logo with `url` after checking the source size.
    pub fn set_logo(&mut self, size: u64, url: impl Into<String>) -> Result<(), CatalogueError> {
        check_logo_size(size)?;
        let mut profile = self.profile.clone();
        profile.logo_url = Some(url.into());
        self.save(profile)
    }

    pub fn remove_logo(&mut self) -> Result<(), CatalogueError> {
        let mut profile = self.profile.clone();
        profile.logo_url = None;
        self.save(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_until_saved() {
        let cache = LocalCache::in_memory();
        let mut store = SellerProfileStore::open(cache.clone());
        assert_eq!(store.profile(), &SellerProfile::default());

        let mut profile = store.profile().clone();
        profile.business_name = "Aso Oke Palace".to_string();
        profile.is_pro = true;
        store.save(profile.clone()).unwrap();

        assert_eq!(SellerProfileStore::open(cache).profile(), &profile);
    }

    #[test]
    fn test_logo_size_limit() {
        let mut store = SellerProfileStore::open(LocalCache::in_memory());
        let err = store.set_logo(MAX_LOGO_BYTES + 1, "data:image/png;base64,AAAA").unwrap_err();
        assert!(matches!(
            err,
            CatalogueError::Validation(ValidationError::LogoTooLarge { .. })
        ));
        assert!(store.profile().logo_url.is_none());

        store.set_logo(MAX_LOGO_BYTES, "data:image/png;base64,AAAA").unwrap();
        assert!(store.profile().logo_url.is_some());
        store.remove_logo().unwrap();
        assert!(store.profile().logo_url.is_none());
    }
}
