//! Raw API record to canonical model conversion.
//!
//! Every normalizer is a pure, total function: missing or mistyped optional
//! fields fall back to defaults, and a record that is not a JSON object
//! normalizes to `None`. Batch variants drop those `None` records.
//!
//! [`normalize`] dispatches on [`Resource`] and reports shapes it cannot
//! handle as a [`NormalizeError`]. Fetch paths never surface that error; they
//! call [`normalize_or_raw`], which degrades to the untouched payload.

mod categories;
mod coupons;
pub(crate) mod fields;
mod orders;
mod products;
mod reviews;
mod users;

pub use categories::{normalize_categories, normalize_category};
pub use coupons::{normalize_coupon, normalize_coupon_at, normalize_coupons};
pub use orders::{normalize_order, normalize_orders};
pub use products::{normalize_product, normalize_products};
pub use reviews::{normalize_review, normalize_reviews};
pub use users::{normalize_user, normalize_users};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::{Category, Coupon, Order, Product, Review, User};
use crate::resource::Resource;

/// Errors produced when a payload does not have a normalizable shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The payload is neither an array nor an object.
    #[error("cannot normalize {resource}: expected array or object, found {found}")]
    UnexpectedShape {
        resource: Resource,
        found: &'static str,
    },

    /// A single-record payload was rejected by the normalizer.
    #[error("cannot normalize {resource}: record rejected")]
    Rejected { resource: Resource },
}

/// Normalized data for any resource.
///
/// Serializes without a tag, so JSON output has the same shape the UI expects
/// from the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    Products(Vec<Product>),
    Product(Box<Product>),
    Orders(Vec<Order>),
    Order(Box<Order>),
    Reviews(Vec<Review>),
    Review(Box<Review>),
    Coupons(Vec<Coupon>),
    Coupon(Box<Coupon>),
    Categories(Vec<Category>),
    Category(Box<Category>),
    Users(Vec<User>),
    User(Box<User>),
    /// Payload passed through untouched (normalization disabled or failed).
    Raw(Value),
}

impl Normalized {
    /// Number of records held.
    ///
    /// Single records count as 1. Raw arrays count their elements, raw
    /// `null` counts as 0 and any other raw value as 1.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Products(v) => v.len(),
            Self::Orders(v) => v.len(),
            Self::Reviews(v) => v.len(),
            Self::Coupons(v) => v.len(),
            Self::Categories(v) => v.len(),
            Self::Users(v) => v.len(),
            Self::Product(_)
            | Self::Order(_)
            | Self::Review(_)
            | Self::Coupon(_)
            | Self::Category(_)
            | Self::User(_) => 1,
            Self::Raw(Value::Array(items)) => items.len(),
            Self::Raw(Value::Null) => 0,
            Self::Raw(_) => 1,
        }
    }

    /// True when no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// True when the payload bypassed normalization.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Product list, if this is one.
    #[must_use]
    pub fn as_products(&self) -> Option<&[Product]> {
        match self {
            Self::Products(products) => Some(products),
            _ => None,
        }
    }
}

/// Normalize a payload for `resource`.
///
/// Arrays (or objects wrapping an array under `data` or the resource name)
/// produce the list variant; objects produce the single-record variant.
///
/// # Errors
///
/// Returns [`NormalizeError`] for scalar payloads and for single records the
/// normalizer rejects.
pub fn normalize(resource: Resource, raw: &Value) -> Result<Normalized, NormalizeError> {
    match raw {
        Value::Array(items) => Ok(normalize_list(resource, items)),
        Value::Object(map) => {
            if let Some(items) = wrapped_list(resource, map) {
                return Ok(normalize_list(resource, items));
            }
            normalize_single(resource, raw).ok_or(NormalizeError::Rejected { resource })
        }
        other => Err(NormalizeError::UnexpectedShape {
            resource,
            found: json_kind(other),
        }),
    }
}

/// Normalize, degrading to [`Normalized::Raw`] instead of failing.
#[must_use]
pub fn normalize_or_raw(resource: Resource, raw: &Value) -> Normalized {
    match normalize(resource, raw) {
        Ok(normalized) => normalized,
        Err(e) => {
            warn!(resource = %resource, error = %e, "Normalization failed, using raw payload");
            Normalized::Raw(raw.clone())
        }
    }
}

fn normalize_list(resource: Resource, items: &[Value]) -> Normalized {
    match resource {
        Resource::Products => Normalized::Products(normalize_products(items)),
        Resource::Orders => Normalized::Orders(normalize_orders(items)),
        Resource::Reviews => Normalized::Reviews(normalize_reviews(items)),
        Resource::Coupons => Normalized::Coupons(normalize_coupons(items)),
        Resource::Categories => Normalized::Categories(normalize_categories(items)),
        Resource::Users => Normalized::Users(normalize_users(items)),
    }
}

fn normalize_single(resource: Resource, raw: &Value) -> Option<Normalized> {
    Some(match resource {
        Resource::Products => Normalized::Product(Box::new(normalize_product(raw)?)),
        Resource::Orders => Normalized::Order(Box::new(normalize_order(raw)?)),
        Resource::Reviews => Normalized::Review(Box::new(normalize_review(raw)?)),
        Resource::Coupons => Normalized::Coupon(Box::new(normalize_coupon(raw)?)),
        Resource::Categories => Normalized::Category(Box::new(normalize_category(raw)?)),
        Resource::Users => Normalized::User(Box::new(normalize_user(raw)?)),
    })
}

/// `{"data": [...]}` or `{"products": [...]}` style envelopes.
fn wrapped_list<'a>(resource: Resource, map: &'a fields::Object) -> Option<&'a [Value]> {
    ["data", resource.as_str()]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Up to two uppercase initials from a display name ("jane van doe" -> "JV").
pub(crate) fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
