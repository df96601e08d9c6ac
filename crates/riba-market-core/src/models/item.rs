use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CatalogueItemId;
use super::price::Price;
use crate::cache::Record;

/// Publication state of a catalogue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Draft,
    Published,
}

impl ItemStatus {
    pub fn toggled(self) -> Self {
        match self {
            ItemStatus::Draft => ItemStatus::Published,
            ItemStatus::Published => ItemStatus::Draft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Draft => "draft",
            ItemStatus::Published => "published",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ItemStatus::Draft),
            "published" => Ok(ItemStatus::Published),
            other => Err(format!("unknown item status '{}'", other)),
        }
    }
}

/// A priced listing that belongs to exactly one catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct CatalogueItem {
    pub id: CatalogueItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Free-text category chosen by the seller.
    #[serde(default)]
    pub category: String,
    /// Image URI, empty when the item has none.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

impl CatalogueItem {
    pub fn is_published(&self) -> bool {
        self.status == ItemStatus::Published
    }

    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }
}

impl Record for CatalogueItem {
    type Id = CatalogueItemId;

    fn id(&self) -> &CatalogueItemId {
        &self.id
    }
}

/// User input for a new catalogue item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image: String,
    pub status: ItemStatus,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}
