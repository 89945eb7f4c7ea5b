//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threadline_core::{Email, ProductId, ReviewId, ReviewStatus};

/// Reviewer details shown next to a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCustomer {
    pub name: String,
    pub email: Option<Email>,
    /// Up to two uppercase initials for the avatar placeholder.
    pub initials: String,
}

/// A normalized product review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub product_name: String,
    pub customer: ReviewCustomer,
    /// Star rating in `1..=5`.
    pub rating: u8,
    pub comment: String,
    pub photo: Option<String>,
    pub status: ReviewStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Lowest and highest accepted star ratings.
    pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

    /// Only approved reviews are shown on product pages.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.status == ReviewStatus::Approved
    }
}
