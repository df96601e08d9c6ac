use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::info;

use super::Cart;
use crate::fixtures;
use crate::models::{Address, AddressId, Order, OrderId, OrderLine, OrderStatus, Product};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Unknown delivery address: {0}")]
    UnknownAddress(AddressId),

    #[error("No delivery address selected")]
    NoAddress,

    #[error("Order can only be placed from the review step")]
    NotReadyToPlace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CheckoutStep {
    #[default]
    Address,
    Payment,
    Review,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 3] = [CheckoutStep::Address, CheckoutStep::Payment, CheckoutStep::Review];

    pub fn label(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "Address",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
        }
    }

    fn next(self) -> Self {
        match self {
            CheckoutStep::Address => CheckoutStep::Payment,
            CheckoutStep::Payment | CheckoutStep::Review => CheckoutStep::Review,
        }
    }

    fn previous(self) -> Self {
        match self {
            CheckoutStep::Address | CheckoutStep::Payment => CheckoutStep::Address,
            CheckoutStep::Review => CheckoutStep::Payment,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Card,
    Bank,
    Cod,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Card, PaymentMethod::Bank, PaymentMethod::Cod];

    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Cod => "cod",
        }
    }

    /// Name recorded on the order.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::Bank => "Bank Transfer",
            PaymentMethod::Cod => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown payment method '{}'", s))
    }
}

/// Order number for the `sequence`th order of `year`: `RBM-2025-005`.
pub fn order_number(year: i32, sequence: u32) -> String {
    format!("RBM-{}-{:03}", year, sequence)
}

/// Three-step checkout over a cart.
#[derive(Debug, Clone)]
pub struct Checkout {
    step: CheckoutStep,
    address: Option<AddressId>,
    payment: PaymentMethod,
    next_sequence: u32,
}

impl Checkout {
    /// Start at the address step with the default address preselected.
    pub fn new(addresses: &[Address]) -> Self {
        let address = addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| addresses.first())
            .map(|a| a.id.clone());
        Self {
            step: CheckoutStep::Address,
            address,
            payment: PaymentMethod::default(),
            next_sequence: fixtures::orders().len() as u32 + 1,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn address(&self) -> Option<&AddressId> {
        self.address.as_ref()
    }

    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    pub fn select_address(&mut self, addresses: &[Address], id: &AddressId) -> Result<(), CheckoutError> {
        if !addresses.iter().any(|a| &a.id == id) {
            return Err(CheckoutError::UnknownAddress(id.clone()));
        }
        self.address = Some(id.clone());
        Ok(())
    }

    pub fn choose_payment(&mut self, method: PaymentMethod) {
        self.payment = method;
    }

    /// Advance one step. Leaving the address step needs an address.
    pub fn next(&mut self) -> Result<CheckoutStep, CheckoutError> {
        if self.step == CheckoutStep::Address && self.address.is_none() {
            return Err(CheckoutError::NoAddress);
        }
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn back(&mut self) -> CheckoutStep {
        self.step = self.step.previous();
        self.step
    }

    /// Jump back to an earlier step. Later steps are only reached through [`next`](Self::next).
    pub fn go_to(&mut self, step: CheckoutStep) -> bool {
        if step >= self.step {
            return false;
        }
        self.step = step;
        true
    }

    /// Turn the cart into a pending order and empty it.
    pub fn place_order(
        &mut self,
        cart: &mut Cart,
        products: &[Product],
        addresses: &[Address],
        today: NaiveDate,
    ) -> Result<Order, CheckoutError> {
        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::NotReadyToPlace);
        }
        let address_id = self.address.as_ref().ok_or(CheckoutError::NoAddress)?;
        let address = addresses
            .iter()
            .find(|a| &a.id == address_id)
            .ok_or_else(|| CheckoutError::UnknownAddress(address_id.clone()))?;

        let entries = cart.entries(products);
        if entries.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let stores: Vec<&str> = cart.by_store(products).iter().map(|g| g.store_name).collect();
        let order = Order {
            id: OrderId::generate(),
            order_number: order_number(today.year(), self.next_sequence),
            date: today,
            status: OrderStatus::Pending,
            items: entries
                .iter()
                .map(|e| OrderLine {
                    name: e.product.name.clone(),
                    quantity: e.quantity,
                    price: e.product.price,
                    image: e.product.image.clone(),
                })
                .collect(),
            total: cart.summary(products).total,
            payment_method: self.payment.label().to_string(),
            delivery_address: address.one_line(),
            store_name: stores.join(", "),
        };

        self.next_sequence += 1;
        cart.clear();
        info!(order = %order.order_number, total = %order.total, "Placed order");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;

    fn review_step(checkout: &mut Checkout) {
        checkout.next().unwrap();
        checkout.next().unwrap();
        assert_eq!(checkout.step(), CheckoutStep::Review);
    }

    #[test]
    fn test_default_address_is_preselected() {
        let checkout = Checkout::new(fixtures::addresses());
        assert_eq!(checkout.address(), Some(&AddressId::new("a1")));
        assert_eq!(checkout.payment(), PaymentMethod::Card);
    }

    #[test]
    fn test_steps_move_forward_and_back() {
        let mut checkout = Checkout::new(fixtures::addresses());
        assert!(!checkout.go_to(CheckoutStep::Review));
        review_step(&mut checkout);
        assert_eq!(checkout.next().unwrap(), CheckoutStep::Review);
        assert_eq!(checkout.back(), CheckoutStep::Payment);
        assert!(checkout.go_to(CheckoutStep::Address));
        assert_eq!(checkout.back(), CheckoutStep::Address);
    }

    #[test]
    fn test_address_is_required() {
        let mut checkout = Checkout::new(&[]);
        assert_eq!(checkout.next().unwrap_err(), CheckoutError::NoAddress);

        let mut checkout = Checkout::new(fixtures::addresses());
        let err = checkout
            .select_address(fixtures::addresses(), &AddressId::new("a9"))
            .unwrap_err();
        assert_eq!(err, CheckoutError::UnknownAddress(AddressId::new("a9")));
        checkout.select_address(fixtures::addresses(), &AddressId::new("a2")).unwrap();
        assert_eq!(checkout.address(), Some(&AddressId::new("a2")));
    }

    #[test]
    fn test_place_order_only_from_review() {
        let mut checkout = Checkout::new(fixtures::addresses());
        let mut cart = Cart::demo();
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let err = checkout
            .place_order(&mut cart, fixtures::products(), fixtures::addresses(), today)
            .unwrap_err();
        assert_eq!(err, CheckoutError::NotReadyToPlace);
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_place_order_builds_pending_order() {
        let mut checkout = Checkout::new(fixtures::addresses());
        checkout.choose_payment("cod".parse().unwrap());
        review_step(&mut checkout);

        let mut cart = Cart::demo();
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let order = checkout
            .place_order(&mut cart, fixtures::products(), fixtures::addresses(), today)
            .unwrap();

        assert_eq!(order.order_number, "RBM-2025-005");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Price::new(352_500));
        assert_eq!(order.item_count(), 4);
        assert_eq!(order.payment_method, "Cash on Delivery");
        assert_eq!(order.delivery_address, "12 Allen Avenue, Ikeja, Lagos");
        assert_eq!(order.store_name, "Mama's Kitchen, TechHub NG, SneakerVault");
        assert!(cart.is_empty());

        let err = checkout
            .place_order(&mut cart, fixtures::products(), fixtures::addresses(), today)
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);

        let mut cart = Cart::demo();
        let second = checkout
            .place_order(&mut cart, fixtures::products(), fixtures::addresses(), today)
            .unwrap();
        assert_eq!(second.order_number, "RBM-2025-006");
    }
}
