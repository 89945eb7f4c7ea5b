//! Catalog product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use threadline_core::{Price, ProductId, StockStatus};

/// A normalized catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL-safe handle derived from the name when the API omits one.
    pub slug: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    /// Whole-number percentage off `original_price`; 0 when not reduced.
    pub discount: u32,
    pub stock: u32,
    pub is_in_stock: bool,
    pub stock_status: StockStatus,
    /// Image URLs, primary image first.
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub category: String,
    pub style: String,
    /// Average review rating (0 when unrated).
    pub rating: f64,
    pub review_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price for display.
    #[must_use]
    pub const fn display_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// First image, used for cards and order line items.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product is sold below its original price.
    #[must_use]
    pub const fn is_on_sale(&self) -> bool {
        self.discount > 0
    }
}
