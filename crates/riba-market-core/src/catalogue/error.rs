use thiserror::Error;

use crate::cache::CacheError;
use crate::models::CatalogueId;

/// Input rejected before anything is changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Catalogue name is required")]
    MissingName,

    #[error("Catalogue category is required")]
    MissingCategory,

    #[error("Unknown catalogue category: {0}")]
    UnknownCategory(String),

    #[error("Item name is required")]
    MissingItemName,

    #[error("Price must be greater than zero")]
    InvalidPrice,

    #[error("Logo must be under {limit} bytes, got {size}")]
    LogoTooLarge { size: u64, limit: u64 },
}

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Items were added to a catalogue that has since been deleted.
    #[error("Catalogue not found: {0}")]
    CatalogueNotFound(CatalogueId),

    /// The change is applied in memory but storage may be behind.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl CatalogueError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogueError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = CatalogueError::from(ValidationError::InvalidPrice);
        assert_eq!(err.to_string(), "Invalid input: Price must be greater than zero");
        assert!(err.is_validation());
        assert!(!CatalogueError::CatalogueNotFound(CatalogueId::new("c1")).is_validation());
    }
}
