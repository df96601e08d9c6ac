use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ProductId;
use super::price::Price;

/// Kind of store a product is sold from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Restaurant,
    Product,
    Service,
}

impl StoreType {
    pub const ALL: [StoreType; 3] = [StoreType::Restaurant, StoreType::Product, StoreType::Service];

    pub fn label(&self) -> &'static str {
        match self {
            StoreType::Restaurant => "Restaurant",
            StoreType::Product => "Product",
            StoreType::Service => "Service",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown store type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductBadge {
    New,
    Sale,
}

/// A marketplace listing from the static fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub original_price: Option<Price>,
    pub image: String,
    pub store_name: String,
    pub store_verified: bool,
    pub store_type: StoreType,
    pub rating: f32,
    pub review_count: u32,
    pub category: String,
    pub badge: Option<ProductBadge>,
    pub discount_percent: Option<u8>,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn is_on_sale(&self) -> bool {
        self.original_price.map(|p| p > self.price).unwrap_or(false)
    }

    /// Amount saved against the original price.
    pub fn savings(&self) -> Price {
        self.original_price
            .map(|p| p.saturating_sub(self.price))
            .unwrap_or(Price::ZERO)
    }
}
