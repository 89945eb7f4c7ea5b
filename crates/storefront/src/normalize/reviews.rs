//! Review normalization.

use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use threadline_core::{Email, ProductId, ReviewId};

use super::fields::{self, Object};
use super::initials;
use crate::models::{Review, ReviewCustomer};

/// Normalize one raw review. Returns `None` when `raw` is not an object.
///
/// Ratings are rounded to the nearest star and clamped to `1..=5`.
#[must_use]
pub fn normalize_review(raw: &Value) -> Option<Review> {
    let obj = raw.as_object()?;

    let product_name = fields::object(obj, "product")
        .and_then(|p| fields::string(p, "name"))
        .or_else(|| fields::string(obj, "productName"))
        .unwrap_or_default();

    Some(Review {
        id: ReviewId::new(fields::id(obj)),
        product_id: ProductId::new(fields::reference_id(obj, "product")),
        product_name,
        customer: normalize_reviewer(obj),
        rating: star_rating(obj),
        comment: fields::string_any(obj, &["comment", "text", "body"]).unwrap_or_default(),
        photo: fields::string_any(obj, &["photo", "image"]),
        status: fields::string(obj, "status")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        created_at: fields::timestamp(obj, "createdAt"),
    })
}

/// Normalize a list of raw reviews, dropping non-object entries.
#[must_use]
pub fn normalize_reviews(raw: &[Value]) -> Vec<Review> {
    raw.iter().filter_map(normalize_review).collect()
}

fn star_rating(obj: &Object) -> u8 {
    let (min, max) = (*Review::RATING_RANGE.start(), *Review::RATING_RANGE.end());
    fields::decimal(obj, "rating")
        .map(|r| r.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|r| r.to_i64())
        .map_or(min, |r| {
            u8::try_from(r.clamp(i64::from(min), i64::from(max))).unwrap_or(min)
        })
}

fn normalize_reviewer(obj: &Object) -> ReviewCustomer {
    let source = ["customer", "user"]
        .iter()
        .find_map(|key| fields::object(obj, key))
        .unwrap_or(obj);

    let name = fields::string_any(source, &["name", "customerName"])
        .or_else(|| fields::string(obj, "customerName"))
        .unwrap_or_else(|| "Anonymous".to_string());
    let email = fields::string(source, "email")
        .or_else(|| fields::string(obj, "customerEmail"))
        .and_then(|e| Email::parse(&e).ok());

    ReviewCustomer {
        initials: initials(&name),
        name,
        email,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use threadline_core::ReviewStatus;

    use super::*;

    #[test]
    fn test_rating_is_clamped() {
        for (raw, expected) in [(json!(0), 1), (json!("4"), 4), (json!(9), 5), (json!(4.6), 5)] {
            let review = normalize_review(&json!({ "rating": raw })).unwrap();
            assert_eq!(review.rating, expected);
        }
        assert_eq!(normalize_review(&json!({})).unwrap().rating, 1);
    }

    #[test]
    fn test_reviewer_snapshot_and_status() {
        let review = normalize_review(&json!({
            "_id": "r1",
            "product": {"_id": "p9", "name": "Linen Shirt"},
            "user": {"name": "mary ann", "email": "Mary@Example.com"},
            "comment": "Great fit",
            "status": "flagged"
        }))
        .unwrap();

        assert_eq!(review.product_id.as_str(), "p9");
        assert_eq!(review.product_name, "Linen Shirt");
        assert_eq!(review.customer.initials, "MA");
        assert_eq!(
            review.customer.email.as_ref().map(Email::as_str),
            Some("mary@example.com")
        );
        assert_eq!(review.status, ReviewStatus::Flagged);
        assert!(!review.is_public());
    }

    #[test]
    fn test_missing_reviewer_is_anonymous() {
        let review = normalize_review(&json!({"status": "approved"})).unwrap();
        assert_eq!(review.customer.name, "Anonymous");
        assert_eq!(review.customer.initials, "A");
        assert!(review.photo.is_none());
        assert!(review.is_public());
    }
}
