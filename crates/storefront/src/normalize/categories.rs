//! Category normalization.

use serde_json::Value;

use threadline_core::CategoryId;

use super::fields;
use crate::models::Category;

/// Normalize one raw category. Returns `None` when `raw` is not an object.
#[must_use]
pub fn normalize_category(raw: &Value) -> Option<Category> {
    let obj = raw.as_object()?;

    let name = fields::string(obj, "name").unwrap_or_default();
    let product_count = fields::count(obj, "productCount")
        .or_else(|| {
            obj.get("products")
                .and_then(Value::as_array)
                .map(|products| u32::try_from(products.len()).unwrap_or(u32::MAX))
        })
        .unwrap_or(0);

    Some(Category {
        id: CategoryId::new(fields::id(obj)),
        slug: fields::string(obj, "slug").unwrap_or_else(|| slug::slugify(&name)),
        description: fields::string(obj, "description").unwrap_or_default(),
        image: fields::string(obj, "image"),
        product_count,
        has_products: product_count > 0,
        name,
    })
}

/// Normalize a list of raw categories, dropping non-object entries.
#[must_use]
pub fn normalize_categories(raw: &[Value]) -> Vec<Category> {
    raw.iter().filter_map(normalize_category).collect()
}
