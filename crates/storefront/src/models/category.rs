//! Catalog categories.

use serde::{Deserialize, Serialize};

use threadline_core::CategoryId;

/// A normalized category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub product_count: u32,
    pub has_products: bool,
}
