//! Product normalization.

use rust_decimal::Decimal;
use serde_json::Value;

use threadline_core::{ProductId, StockStatus, discount_percent};

use super::fields::{self, Object};
use crate::models::Product;

/// Normalize one raw product. Returns `None` when `raw` is not an object.
#[must_use]
pub fn normalize_product(raw: &Value) -> Option<Product> {
    let obj = raw.as_object()?;

    let name = fields::string_any(obj, &["name", "title"]).unwrap_or_default();
    let price = fields::decimal(obj, "price").unwrap_or(Decimal::ZERO);
    let original_price = ["originalPrice", "original_price", "compareAtPrice"]
        .iter()
        .find_map(|key| fields::decimal(obj, key));
    let stock = ["stock", "countInStock", "quantity"]
        .iter()
        .find_map(|key| fields::count(obj, key))
        .unwrap_or(0);

    let mut images = fields::string_list(obj, "images");
    if images.is_empty()
        && let Some(image) = fields::string(obj, "image")
    {
        images.push(image);
    }

    let slug = fields::string(obj, "slug").unwrap_or_else(|| slug::slugify(&name));

    Some(Product {
        id: ProductId::new(fields::id(obj)),
        slug,
        description: fields::string(obj, "description").unwrap_or_default(),
        price,
        original_price,
        discount: discount_percent(original_price, price),
        stock,
        is_in_stock: stock > 0,
        stock_status: StockStatus::from_stock(stock),
        images,
        colors: fields::string_list(obj, "colors"),
        sizes: fields::string_list(obj, "sizes"),
        category: category_name(obj),
        style: fields::string(obj, "style").unwrap_or_default(),
        rating: fields::float(obj, "rating").unwrap_or(0.0),
        review_count: ["numReviews", "reviewCount", "reviewsCount"]
            .iter()
            .find_map(|key| fields::count(obj, key))
            .unwrap_or(0),
        created_at: fields::timestamp(obj, "createdAt"),
        name,
    })
}

/// Normalize a list of raw products, dropping non-object entries.
#[must_use]
pub fn normalize_products(raw: &[Value]) -> Vec<Product> {
    raw.iter().filter_map(normalize_product).collect()
}

/// Category may be a plain name or a populated category object.
fn category_name(obj: &Object) -> String {
    fields::object(obj, "category")
        .and_then(|category| fields::string(category, "name"))
        .or_else(|| fields::string(obj, "category"))
        .unwrap_or_default()
}
