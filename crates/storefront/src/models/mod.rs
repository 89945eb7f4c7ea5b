//! Canonical in-memory shapes for storefront records.
//!
//! These types are what UI code consumes. They are produced only by the
//! [`normalize`](crate::normalize) module from raw API payloads and carry the
//! derived fields (discount, stock status, initials, ...) precomputed.

mod category;
mod coupon;
mod order;
mod product;
mod review;
mod user;

pub use category::Category;
pub use coupon::Coupon;
pub use order::{CustomerSnapshot, Order, OrderItem, OrderSummary};
pub use product::Product;
pub use review::{Review, ReviewCustomer};
pub use user::User;

use serde::{Deserialize, Serialize};

/// Postal address attached to users and order customer snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Address {
    /// True when every component is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .iter()
        .all(|part| part.trim().is_empty())
    }

    /// Single-line rendering, skipping blank components.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_one_line_skips_blanks() {
        let address = Address {
            street: "12 Canal St".to_string(),
            city: "Boston".to_string(),
            state: String::new(),
            zip_code: "02114".to_string(),
            country: " ".to_string(),
        };
        assert_eq!(address.one_line(), "12 Canal St, Boston, 02114");
        assert!(!address.is_empty());
        assert!(Address::default().is_empty());
    }
}
