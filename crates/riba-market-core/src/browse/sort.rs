use std::fmt;
use std::str::FromStr;

use crate::models::Product;
use crate::utils::cmp_ignore_case;

/// Ordering of the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Fixture order.
    #[default]
    Featured,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    /// Highest rating first.
    Rating,
    Newest,
}

impl ProductSort {
    pub const ALL: [ProductSort; 7] = [
        ProductSort::Featured,
        ProductSort::NameAsc,
        ProductSort::NameDesc,
        ProductSort::PriceAsc,
        ProductSort::PriceDesc,
        ProductSort::Rating,
        ProductSort::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSort::Featured => "featured",
            ProductSort::NameAsc => "name-asc",
            ProductSort::NameDesc => "name-desc",
            ProductSort::PriceAsc => "price-asc",
            ProductSort::PriceDesc => "price-desc",
            ProductSort::Rating => "rating",
            ProductSort::Newest => "newest",
        }
    }

    /// Stable sort; `Featured` leaves the order untouched.
    pub fn sort(&self, products: &mut [&Product]) {
        match self {
            ProductSort::Featured => {}
            ProductSort::NameAsc => products.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name)),
            ProductSort::NameDesc => products.sort_by(|a, b| cmp_ignore_case(&b.name, &a.name)),
            ProductSort::PriceAsc => products.sort_by_key(|p| p.price),
            ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            ProductSort::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

impl fmt::Display for ProductSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price-low" => Ok(ProductSort::PriceAsc),
            "price-high" => Ok(ProductSort::PriceDesc),
            wanted => Self::ALL
                .into_iter()
                .find(|sort| sort.as_str() == wanted)
                .ok_or_else(|| format!("unknown sort '{}'", s)),
        }
    }
}
