//! Static marketplace fixtures.
//!
//! Products, orders, addresses and reviews are demo data compiled into the
//! crate and built once on first access.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    Address, AddressId, Order, OrderId, OrderLine, OrderStatus, Price, Product, ProductBadge,
    ProductId, Review, ReviewId, StoreType,
};

/// 2024-12-01T00:00:00Z; fixture listings are dated in days after this.
const LISTING_EPOCH: i64 = 1_733_011_200;

const SECONDS_PER_DAY: i64 = 86_400;

static PRODUCTS: OnceLock<Vec<Product>> = OnceLock::new();
static ORDERS: OnceLock<Vec<Order>> = OnceLock::new();
static ADDRESSES: OnceLock<Vec<Address>> = OnceLock::new();
static REVIEWS: OnceLock<Vec<Review>> = OnceLock::new();

fn listed(day: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(LISTING_EPOCH + day * SECONDS_PER_DAY, 0).unwrap_or_default()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn image(photo: &str, w: u32, h: u32) -> String {
    format!("https://images.unsplash.com/photo-{}?w={}&h={}&fit=crop", photo, w, h)
}

struct Listing {
    id: &'static str,
    name: &'static str,
    price: u64,
    original_price: Option<u64>,
    photo: &'static str,
    store: &'static str,
    verified: bool,
    store_type: StoreType,
    rating: f32,
    reviews: u32,
    category: &'static str,
    badge: Option<ProductBadge>,
    discount: Option<u8>,
    day: i64,
}

impl Listing {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name.to_string(),
            price: Price::new(self.price),
            original_price: self.original_price.map(Price::new),
            image: image(self.photo, 400, 300),
            store_name: self.store.to_string(),
            store_verified: self.verified,
            store_type: self.store_type,
            rating: self.rating,
            review_count: self.reviews,
            category: self.category.to_string(),
            badge: self.badge,
            discount_percent: self.discount,
            in_stock: true,
            created_at: listed(self.day),
        }
    }
}

fn build_products() -> Vec<Product> {
    use ProductBadge::{New, Sale};
    use StoreType::{Product as Goods, Restaurant, Service};

    let listings = vec![
        Listing { id: "1", name: "Jollof Rice Party Pack", price: 15000, original_price: Some(18000), photo: "1604329760661-e71dc83f8f26", store: "Mama's Kitchen", verified: true, store_type: Restaurant, rating: 4.8, reviews: 234, category: "Food", badge: Some(Sale), discount: Some(17), day: 0 },
        Listing { id: "2", name: "Premium Ankara Fabric (6 yards)", price: 8500, original_price: None, photo: "1590735213920-68192a487bc2", store: "Aso Oke Palace", verified: true, store_type: Goods, rating: 4.6, reviews: 89, category: "Fashion", badge: Some(New), discount: None, day: 5 },
        Listing { id: "3", name: "Professional Photography Session", price: 45000, original_price: None, photo: "1554048612-b6a482bc67e5", store: "SnapPro Studios", verified: false, store_type: Service, rating: 4.9, reviews: 56, category: "Services", badge: None, discount: None, day: 9 },
        Listing { id: "4", name: "Samsung Galaxy A54 5G", price: 235000, original_price: Some(280000), photo: "1610945415295-d9bbf067e59c", store: "TechHub NG", verified: true, store_type: Goods, rating: 4.7, reviews: 312, category: "Electronics", badge: Some(Sale), discount: Some(16), day: 14 },
        Listing { id: "5", name: "Suya Special (10 sticks)", price: 5000, original_price: None, photo: "1555939594-58d7cb561ad1", store: "Abuja Grills", verified: true, store_type: Restaurant, rating: 4.5, reviews: 178, category: "Food", badge: None, discount: None, day: 3 },
        Listing { id: "6", name: "Home Cleaning Service", price: 20000, original_price: None, photo: "1581578731548-c64695cc6952", store: "CleanSpace NG", verified: true, store_type: Service, rating: 4.4, reviews: 67, category: "Services", badge: Some(New), discount: None, day: 20 },
        Listing { id: "7", name: "Nike Air Max 90 (Original)", price: 85000, original_price: Some(95000), photo: "1542291026-7eec264c27ff", store: "SneakerVault", verified: true, store_type: Goods, rating: 4.8, reviews: 201, category: "Fashion", badge: Some(Sale), discount: Some(11), day: 11 },
        Listing { id: "8", name: "Peppered Chicken & Fried Rice", price: 4500, original_price: None, photo: "1598515214211-89d3c73ae83b", store: "The Food Court", verified: false, store_type: Restaurant, rating: 4.3, reviews: 145, category: "Food", badge: None, discount: None, day: 1 },
        Listing { id: "9", name: "Laptop Repair Service", price: 15000, original_price: None, photo: "1517694712202-14dd9538aa97", store: "FixIt NG", verified: true, store_type: Service, rating: 4.6, reviews: 89, category: "Services", badge: None, discount: None, day: 17 },
        Listing { id: "10", name: "iPhone 15 Pro Max Case", price: 5500, original_price: Some(7000), photo: "1601784551446-20c9e07cdbdb", store: "TechHub NG", verified: true, store_type: Goods, rating: 4.2, reviews: 45, category: "Electronics", badge: Some(Sale), discount: Some(21), day: 22 },
        Listing { id: "11", name: "Agbada Set (3 Piece)", price: 65000, original_price: None, photo: "1594938298603-c8148c4dae35", store: "Aso Oke Palace", verified: true, store_type: Goods, rating: 4.9, reviews: 34, category: "Fashion", badge: Some(New), discount: None, day: 25 },
        Listing { id: "12", name: "Shawarma Special Combo", price: 3500, original_price: None, photo: "1529006557810-274b9b2fc783", store: "Abuja Grills", verified: true, store_type: Restaurant, rating: 4.7, reviews: 210, category: "Food", badge: None, discount: None, day: 7 },
    ];

    listings.into_iter().map(Listing::into_product).collect()
}

fn line(name: &str, quantity: u32, price: u64, photo: &str) -> OrderLine {
    OrderLine {
        name: name.to_string(),
        quantity,
        price: Price::new(price),
        image: image(photo, 80, 80),
    }
}

fn build_orders() -> Vec<Order> {
    vec![
        Order {
            id: OrderId::new("o1"),
            order_number: "RBM-2024-001".to_string(),
            date: date(2024, 12, 15),
            status: OrderStatus::Delivered,
            items: vec![line("Samsung Galaxy A54 5G", 1, 235000, "1610945415295-d9bbf067e59c")],
            total: Price::new(237500),
            payment_method: "Card".to_string(),
            delivery_address: "12 Allen Ave, Ikeja, Lagos".to_string(),
            store_name: "TechHub NG".to_string(),
        },
        Order {
            id: OrderId::new("o2"),
            order_number: "RBM-2024-002".to_string(),
            date: date(2024, 12, 20),
            status: OrderStatus::Shipped,
            items: vec![
                line("Nike Air Max 90", 1, 85000, "1542291026-7eec264c27ff"),
                line("iPhone 15 Pro Max Case", 2, 5500, "1601784551446-20c9e07cdbdb"),
            ],
            total: Price::new(98500),
            payment_method: "Bank Transfer".to_string(),
            delivery_address: "45 Admiralty Way, Lekki, Lagos".to_string(),
            store_name: "SneakerVault".to_string(),
        },
        Order {
            id: OrderId::new("o3"),
            order_number: "RBM-2024-003".to_string(),
            date: date(2025, 1, 5),
            status: OrderStatus::Processing,
            items: vec![line("Jollof Rice Party Pack", 3, 15000, "1604329760661-e71dc83f8f26")],
            total: Price::new(47500),
            payment_method: "Cash on Delivery".to_string(),
            delivery_address: "8 Wuse Zone 5, Abuja".to_string(),
            store_name: "Mama's Kitchen".to_string(),
        },
        Order {
            id: OrderId::new("o4"),
            order_number: "RBM-2024-004".to_string(),
            date: date(2025, 1, 10),
            status: OrderStatus::Pending,
            items: vec![line("Home Cleaning Service", 1, 20000, "1581578731548-c64695cc6952")],
            total: Price::new(20000),
            payment_method: "Card".to_string(),
            delivery_address: "3 Garki Area 11, Abuja".to_string(),
            store_name: "CleanSpace NG".to_string(),
        },
    ]
}

fn build_addresses() -> Vec<Address> {
    vec![
        Address {
            id: AddressId::new("a1"),
            label: "Home".to_string(),
            full_address: "12 Allen Avenue".to_string(),
            city: "Ikeja".to_string(),
            state: "Lagos".to_string(),
            phone: "+234 801 234 5678".to_string(),
            is_default: true,
        },
        Address {
            id: AddressId::new("a2"),
            label: "Office".to_string(),
            full_address: "45 Admiralty Way".to_string(),
            city: "Lekki".to_string(),
            state: "Lagos".to_string(),
            phone: "+234 802 345 6789".to_string(),
            is_default: false,
        },
    ]
}

fn review(id: &str, author: &str, img: u32, rating: u8, day: NaiveDate, comment: &str, helpful: u32) -> Review {
    Review {
        id: ReviewId::new(id),
        author: author.to_string(),
        avatar: format!("https://i.pravatar.cc/40?img={}", img),
        rating,
        date: day,
        comment: comment.to_string(),
        helpful,
    }
}

fn build_reviews() -> Vec<Review> {
    vec![
        review("r1", "Chidi O.", 1, 5, date(2025, 1, 10), "Excellent product! Fast delivery and great quality. Would definitely recommend to anyone looking for value.", 12),
        review("r2", "Amina B.", 5, 4, date(2025, 1, 8), "Good product overall. Packaging could be better but the item itself is wonderful.", 8),
        review("r3", "Emeka N.", 3, 5, date(2025, 1, 5), "Amazing value for money. The vendor was very responsive and helpful.", 15),
        review("r4", "Fatima Y.", 9, 3, date(2025, 1, 2), "Decent product but took a bit longer than expected to arrive.", 4),
    ]
}

/// Every fixture product, in featured order.
pub fn products() -> &'static [Product] {
    PRODUCTS.get_or_init(build_products)
}

/// The first eight products, shown on the landing page.
pub fn featured_products() -> &'static [Product] {
    let all = products();
    &all[..all.len().min(8)]
}

pub fn orders() -> &'static [Order] {
    ORDERS.get_or_init(build_orders)
}

pub fn addresses() -> &'static [Address] {
    ADDRESSES.get_or_init(build_addresses)
}

pub fn reviews() -> &'static [Review] {
    REVIEWS.get_or_init(build_reviews)
}

/// Average star rating of the fixture reviews.
pub fn average_review_rating() -> f32 {
    let reviews = reviews();
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    total as f32 / reviews.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_product_ids_are_unique() {
        let mut ids: Vec<&str> = products().iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), products().len());
        assert_eq!(products().len(), 12);
    }

    #[test]
    fn test_fixture_dates_are_set() {
        assert!(products().iter().all(|p| p.created_at > DateTime::<Utc>::default()));
        assert_eq!(orders()[0].date, date(2024, 12, 15));
    }

    #[test]
    fn test_average_review_rating() {
        assert!((average_review_rating() - 4.25).abs() < f32::EPSILON);
    }
}
