use serde::{Deserialize, Serialize};

/// Public-facing details of the seller, shown on catalogue pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub business_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Data URL or link to the logo image.
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub google_maps_link: String,
    #[serde(default)]
    pub is_pro: bool,
    #[serde(default)]
    pub hide_sold_count: bool,
}

impl Default for SellerProfile {
    fn default() -> Self {
        Self {
            business_name: "TechHub NG".to_string(),
            description: "Your one-stop shop for electronics and gadgets".to_string(),
            email: "hello@techhubng.com".to_string(),
            phone: "+234 801 234 5678".to_string(),
            logo_url: None,
            google_maps_link: String::new(),
            is_pro: false,
            hide_sold_count: false,
        }
    }
}
