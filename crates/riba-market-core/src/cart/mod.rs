//! Shopping cart and checkout flow.
//!
//! The cart holds product ids and quantities only; prices, names and stores
//! are resolved against the product list whenever a view is built, and lines
//! whose product cannot be found are left out of every view.

pub mod checkout;

pub use checkout::{Checkout, CheckoutError, CheckoutStep, PaymentMethod};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Price, Product, ProductId};

/// Flat delivery fee charged on a non-empty cart.
pub const DELIVERY_FEE: Price = Price::new(2_500);

/// Percentage taken off the subtotal by a discount code.
pub const DISCOUNT_PERCENT: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A cart line joined with its product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartEntry<'a> {
    pub product: &'a Product,
    pub quantity: u32,
}

impl CartEntry<'_> {
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Lines of one store, in cart order.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup<'a> {
    pub store_name: &'a str,
    pub entries: Vec<CartEntry<'a>>,
}

impl StoreGroup<'_> {
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub lines: usize,
    pub subtotal: Price,
    pub discount: Price,
    pub delivery: Price,
    pub total: Price,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    #[serde(default)]
    discount_code: Option<String>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cart the demo starts with.
    pub fn demo() -> Self {
        let mut cart = Self::new();
        cart.add(ProductId::new("1"), 2);
        cart.add(ProductId::new("4"), 1);
        cart.add(ProductId::new("7"), 1);
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount_code = None;
    }

    /// Add `quantity` of a product, merging with an existing line.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        let quantity = quantity.max(1);
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id,
                quantity,
            }),
        }
    }

    /// Change a quantity by `delta`, never going below one.
    /// Returns the new quantity, `None` when the product is not in the cart.
    pub fn adjust(&mut self, product_id: &ProductId, delta: i32) -> Option<u32> {
        let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) else {
            debug!(product = %product_id, "Adjust ignored, product not in cart");
            return None;
        };
        let next = (i64::from(line.quantity) + i64::from(delta)).clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(line.quantity)
    }

    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        before != self.lines.len()
    }

    /// Apply a discount code. Any non-blank code is accepted.
    pub fn apply_discount(&mut self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return false;
        }
        self.discount_code = Some(code.to_string());
        true
    }

    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code.as_deref()
    }

    /// Lines whose product is known, in cart order.
    pub fn entries<'a>(&self, products: &'a [Product]) -> Vec<CartEntry<'a>> {
        self.lines
            .iter()
            .filter_map(|line| {
                let product = products.iter().find(|p| p.id == line.product_id);
                if product.is_none() {
                    debug!(product = %line.product_id, "Skipping cart line with unknown product");
                }
                product.map(|product| CartEntry {
                    product,
                    quantity: line.quantity,
                })
            })
            .collect()
    }

    pub fn summary(&self, products: &[Product]) -> CartSummary {
        let entries = self.entries(products);
        let subtotal: Price = entries.iter().map(CartEntry::line_total).sum();
        let discount = if self.discount_code.is_some() {
            subtotal.percent(DISCOUNT_PERCENT)
        } else {
            Price::ZERO
        };
        let delivery = if entries.is_empty() { Price::ZERO } else { DELIVERY_FEE };
        CartSummary {
            lines: entries.len(),
            subtotal,
            discount,
            delivery,
            total: subtotal.saturating_sub(discount) + delivery,
        }
    }

    /// Entries grouped by store, stores in order of first appearance.
    pub fn by_store<'a>(&self, products: &'a [Product]) -> Vec<StoreGroup<'a>> {
        let mut groups: Vec<StoreGroup<'a>> = Vec::new();
        for entry in self.entries(products) {
            let store_name = entry.product.store_name.as_str();
            match groups.iter_mut().find(|g| g.store_name == store_name) {
                Some(group) => group.entries.push(entry),
                None => groups.push(StoreGroup {
                    store_name,
                    entries: vec![entry],
                }),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_demo_summary() {
        let cart = Cart::demo();
        let summary = cart.summary(fixtures::products());
        // 2 x 15,000 + 235,000 + 85,000
        assert_eq!(summary.subtotal, Price::new(350_000));
        assert_eq!(summary.discount, Price::ZERO);
        assert_eq!(summary.delivery, DELIVERY_FEE);
        assert_eq!(summary.total, Price::new(352_500));
        assert_eq!(summary.lines, 3);
    }

    #[test]
    fn test_discount_is_ten_percent_rounded() {
        let mut cart = Cart::new();
        assert!(!cart.apply_discount("   "));
        cart.add(ProductId::new("12"), 1);
        cart.add(ProductId::new("8"), 1);
        assert!(cart.apply_discount("RIBA10"));

        let summary = cart.summary(fixtures::products());
        assert_eq!(summary.subtotal, Price::new(8_000));
        assert_eq!(summary.discount, Price::new(800));
        assert_eq!(summary.total, Price::new(9_700));
    }

    #[test]
    fn test_empty_cart_has_no_delivery() {
        let summary = Cart::new().summary(fixtures::products());
        assert_eq!(summary.total, Price::ZERO);
        assert_eq!(summary.delivery, Price::ZERO);
    }

    #[test]
    fn test_adjust_clamps_at_one() {
        let mut cart = Cart::demo();
        let jollof = ProductId::new("1");
        assert_eq!(cart.adjust(&jollof, 3), Some(5));
        assert_eq!(cart.adjust(&jollof, -10), Some(1));
        assert_eq!(cart.adjust(&ProductId::new("99"), 1), None);
    }

    #[test]
    fn test_add_merges_and_remove() {
        let mut cart = Cart::demo();
        cart.add(ProductId::new("4"), 2);
        assert_eq!(cart.lines().len(), 3);
        assert_eq!(cart.lines()[1].quantity, 3);

        assert!(cart.remove(&ProductId::new("4")));
        assert!(!cart.remove(&ProductId::new("4")));
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_unknown_products_are_skipped() {
        let mut cart = Cart::demo();
        cart.add(ProductId::new("gone"), 1);
        assert_eq!(cart.entries(fixtures::products()).len(), 3);
        assert_eq!(cart.summary(fixtures::products()).lines, 3);
    }

    #[test]
    fn test_by_store_keeps_first_seen_order() {
        let mut cart = Cart::new();
        cart.add(ProductId::new("4"), 1);
        cart.add(ProductId::new("5"), 2);
        cart.add(ProductId::new("10"), 1);

        let groups = cart.by_store(fixtures::products());
        let stores: Vec<&str> = groups.iter().map(|g| g.store_name).collect();
        assert_eq!(stores, ["TechHub NG", "Abuja Grills"]);
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].subtotal(), Price::new(240_500));
        assert_eq!(groups[1].subtotal(), Price::new(10_000));
    }
}
