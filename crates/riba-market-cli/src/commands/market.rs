use std::collections::BTreeSet;

use anyhow::{anyhow, Result};

use riba_market_core::browse::{
    browse, product as find_product, related, CategorySelection, PriceRange, ProductFilter,
    ProductSort, DEFAULT_MAX_PRICE,
};
use riba_market_core::cart::{Cart, Checkout, PaymentMethod};
use riba_market_core::fixtures;
use riba_market_core::models::{AddressId, Product, ProductId, StoreType};
use riba_market_core::utils::truncate_string;

use super::{print_json, Context};

/// Related products shown under a product.
const RELATED_LIMIT: usize = 4;

pub struct ProductArgs {
    pub categories: Vec<String>,
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub verified: bool,
    pub store_types: Vec<StoreType>,
    pub search: String,
    pub sort: ProductSort,
}

impl ProductArgs {
    fn filter(self) -> ProductFilter {
        ProductFilter {
            categories: CategorySelection::only(self.categories),
            price: PriceRange::new(
                self.min.unwrap_or(0),
                self.max.unwrap_or(DEFAULT_MAX_PRICE.amount()),
            ),
            verified_only: self.verified,
            store_types: self.store_types.into_iter().collect::<BTreeSet<_>>(),
            search: self.search,
        }
    }
}

fn print_product_row(p: &Product) {
    println!(
        "{:>3}  {:<34}  {:>10}  {:<16} {}  {:.1}★ ({})",
        p.id,
        truncate_string(&p.name, 34),
        p.price,
        truncate_string(&p.store_name, 16),
        if p.store_verified { "✓" } else { " " },
        p.rating,
        p.review_count,
    );
}

pub fn products(ctx: &Context, args: ProductArgs) -> Result<()> {
    let sort = args.sort;
    let shown = browse(&args.filter(), sort);
    if ctx.json {
        return print_json(&shown);
    }
    println!("{} results", shown.len());
    for p in shown {
        print_product_row(p);
    }
    Ok(())
}

pub fn product(ctx: &Context, id: &str) -> Result<()> {
    let product = find_product(&ProductId::new(id)).ok_or_else(|| anyhow!("No product with id '{}'", id))?;
    let related = related(product, RELATED_LIMIT);
    if ctx.json {
        return print_json(&serde_json::json!({ "product": product, "related": related }));
    }

    println!("{}", product.name);
    println!("{} from {} ({})", product.price, product.store_name, product.store_type);
    if product.is_on_sale() {
        println!("Save {}", product.savings());
    }
    println!(
        "Rated {:.1} from {} reviews, buyers average {:.2}",
        product.rating,
        product.review_count,
        fixtures::average_review_rating()
    );
    if !related.is_empty() {
        println!();
        println!("Related products:");
        for p in related {
            print_product_row(p);
        }
    }
    Ok(())
}

pub fn cart(ctx: &Context, discount: Option<&str>, by_store: bool) -> Result<()> {
    let products = fixtures::products();
    let mut cart = Cart::demo();
    if let Some(code) = discount {
        if !cart.apply_discount(code) {
            return Err(anyhow!("Discount code is empty"));
        }
    }
    let summary = cart.summary(products);
    if ctx.json {
        return print_json(&summary);
    }

    if by_store {
        for group in cart.by_store(products) {
            println!("{} ({})", group.store_name, group.subtotal());
            for entry in &group.entries {
                println!("  {} x {:<32} {:>10}", entry.quantity, truncate_string(&entry.product.name, 32), entry.line_total());
            }
        }
    } else {
        for entry in cart.entries(products) {
            println!("{} x {:<34} {:>10}", entry.quantity, truncate_string(&entry.product.name, 34), entry.line_total());
        }
    }
    println!();
    println!("Subtotal  {:>12}", summary.subtotal);
    if !summary.discount.is_zero() {
        println!("Discount  {:>12}", format!("-{}", summary.discount));
    }
    println!("Delivery  {:>12}", summary.delivery);
    println!("Total     {:>12}", summary.total);
    Ok(())
}

pub fn checkout(ctx: &Context, address: Option<&str>, payment: PaymentMethod) -> Result<()> {
    let products = fixtures::products();
    let addresses = fixtures::addresses();
    let mut cart = Cart::demo();
    let mut checkout = Checkout::new(addresses);

    if let Some(id) = address {
        checkout.select_address(addresses, &AddressId::new(id))?;
    }
    checkout.choose_payment(payment);
    checkout.next()?;
    checkout.next()?;

    let today = chrono::Local::now().date_naive();
    let order = checkout.place_order(&mut cart, products, addresses, today)?;
    if ctx.json {
        return print_json(&order);
    }
    println!("Order #{} placed", order.order_number);
    println!("{} items, total {}, paid by {}", order.item_count(), order.total, order.payment_method);
    println!("Delivering to {}", order.delivery_address);
    Ok(())
}
