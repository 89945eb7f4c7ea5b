//! Discount coupons.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::Signed;
use serde::{Deserialize, Serialize};

use threadline_core::{CouponId, CouponStatus, DiscountKind};

/// A normalized coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    /// Redemption code, upper-cased.
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    pub discount_kind: DiscountKind,
    pub status: CouponStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub usage_count: u32,
    /// Validity at normalization time; see [`Coupon::is_valid_at`].
    pub is_valid: bool,
}

impl Coupon {
    /// Active and `now` inside the inclusive `[start_date, end_date]` window.
    ///
    /// A coupon with either bound missing is never valid.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                self.status == CouponStatus::Active && start <= now && now <= end
            }
            _ => false,
        }
    }

    /// Discount applied to `subtotal`, never more than the subtotal itself.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        let raw = match self.discount_kind {
            // Overflow needs a percentage beyond +/-100; the clamp below settles it.
            DiscountKind::Percentage => (subtotal / Decimal::ONE_HUNDRED)
                .checked_mul(self.discount)
                .unwrap_or_else(|| subtotal * self.discount.signum()),
            DiscountKind::Fixed => self.discount,
        };
        raw.clamp(Decimal::ZERO, subtotal.max(Decimal::ZERO))
    }
}
