//! Coupon normalization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use threadline_core::{CouponId, CouponStatus};

use super::fields;
use crate::models::Coupon;

/// Normalize one raw coupon, evaluating validity against the current time.
#[must_use]
pub fn normalize_coupon(raw: &Value) -> Option<Coupon> {
    normalize_coupon_at(raw, Utc::now())
}

/// Normalize one raw coupon, evaluating validity at `now`.
///
/// Returns `None` when `raw` is not an object.
#[must_use]
pub fn normalize_coupon_at(raw: &Value, now: DateTime<Utc>) -> Option<Coupon> {
    let obj = raw.as_object()?;

    // Older records carry `isActive` instead of a status string.
    let status = fields::string(obj, "status")
        .and_then(|s| s.parse().ok())
        .or_else(|| {
            fields::boolean(obj, "isActive").map(|active| {
                if active {
                    CouponStatus::Active
                } else {
                    CouponStatus::Inactive
                }
            })
        })
        .unwrap_or_default();

    let mut coupon = Coupon {
        id: CouponId::new(fields::id(obj)),
        code: fields::string(obj, "code")
            .unwrap_or_default()
            .to_uppercase(),
        discount: fields::decimal(obj, "discount")
            .or_else(|| fields::decimal(obj, "discountValue"))
            .unwrap_or(Decimal::ZERO),
        discount_kind: fields::string_any(obj, &["discountType", "type"])
            .and_then(|k| k.parse().ok())
            .unwrap_or_default(),
        status,
        start_date: fields::timestamp(obj, "startDate"),
        end_date: fields::timestamp(obj, "endDate"),
        usage_count: fields::count(obj, "usageCount").unwrap_or(0),
        is_valid: false,
    };
    coupon.is_valid = coupon.is_valid_at(now);
    Some(coupon)
}

/// Normalize a list of raw coupons, dropping non-object entries.
#[must_use]
pub fn normalize_coupons(raw: &[Value]) -> Vec<Coupon> {
    let now = Utc::now();
    raw.iter()
        .filter_map(|coupon| normalize_coupon_at(coupon, now))
        .collect()
}
