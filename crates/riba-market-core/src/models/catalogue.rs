use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CatalogueId;
use crate::cache::Record;

/// The fixed set of catalogue categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "kebab-case")]
pub enum CatalogueCategory {
    Products,
    Services,
    FoodDrinks,
    Fashion,
}

impl CatalogueCategory {
    pub const ALL: [CatalogueCategory; 4] = [
        CatalogueCategory::Products,
        CatalogueCategory::Services,
        CatalogueCategory::FoodDrinks,
        CatalogueCategory::Fashion,
    ];

    /// Stored identifier, e.g. `food-drinks`.
    pub fn slug(&self) -> &'static str {
        match self {
            CatalogueCategory::Products => "products",
            CatalogueCategory::Services => "services",
            CatalogueCategory::FoodDrinks => "food-drinks",
            CatalogueCategory::Fashion => "fashion",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CatalogueCategory::Products => "Products",
            CatalogueCategory::Services => "Services",
            CatalogueCategory::FoodDrinks => "Food & Drinks",
            CatalogueCategory::Fashion => "Fashion",
        }
    }
}

impl fmt::Display for CatalogueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown catalogue category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for CatalogueCategory {
    type Err = UnknownCategory;

    /// Accepts the slug or the label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A seller-defined grouping of items, shareable through a public link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Catalogue {
    pub id: CatalogueId,
    pub name: String,
    pub category: CatalogueCategory,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    /// `None` means visible; only an explicit `false` hides the catalogue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl Catalogue {
    pub fn is_visible(&self) -> bool {
        self.is_public != Some(false)
    }
}

impl Record for Catalogue {
    type Id = CatalogueId;

    fn id(&self) -> &CatalogueId {
        &self.id
    }
}

/// User input for creating or editing a catalogue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogueDraft {
    pub name: String,
    pub category: Option<CatalogueCategory>,
    pub description: String,
}

impl CatalogueDraft {
    pub fn new(name: impl Into<String>, category: CatalogueCategory) -> Self {
        Self {
            name: name.into(),
            category: Some(category),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Presentation settings of a catalogue's public page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Customization {
    pub banner_color: Option<String>,
    pub accent_color: Option<String>,
    pub welcome_message: Option<String>,
    pub is_public: Option<bool>,
}

/// Item counts of one catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogueStats {
    pub total: usize,
    pub published: usize,
    pub draft: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parses_slug_and_label() {
        assert_eq!("fashion".parse::<CatalogueCategory>().unwrap(), CatalogueCategory::Fashion);
        assert_eq!("food-drinks".parse::<CatalogueCategory>().unwrap(), CatalogueCategory::FoodDrinks);
        assert_eq!("Food & Drinks".parse::<CatalogueCategory>().unwrap(), CatalogueCategory::FoodDrinks);
        assert!("furniture".parse::<CatalogueCategory>().is_err());
    }

    #[test]
    fn test_catalogue_json_matches_browser_layout() {
        let json = r#"{
            "id": "c1",
            "name": "Summer",
            "category": "food-drinks",
            "description": "",
            "createdAt": "2025-01-10T12:00:00.000Z",
            "welcomeMessage": "Hi"
        }"#;
        let catalogue: Catalogue = serde_json::from_str(json).unwrap();
        assert_eq!(catalogue.category, CatalogueCategory::FoodDrinks);
        assert_eq!(catalogue.welcome_message.as_deref(), Some("Hi"));
        assert!(catalogue.is_visible());

        let out = serde_json::to_value(&catalogue).unwrap();
        assert!(out.get("createdAt").is_some());
        assert!(out.get("isPublic").is_none());
    }

    #[test]
    fn test_only_explicit_false_hides() {
        let mut catalogue: Catalogue = serde_json::from_str(
            r#"{"id":"c","name":"n","category":"fashion","createdAt":"2025-01-10T12:00:00Z"}"#,
        )
        .unwrap();
        assert!(catalogue.is_visible());
        catalogue.is_public = Some(true);
        assert!(catalogue.is_visible());
        catalogue.is_public = Some(false);
        assert!(!catalogue.is_visible());
    }
}
