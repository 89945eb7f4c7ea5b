//! Status enums for catalog, order, review, coupon and user records.
//!
//! The REST API sends these as lowercase strings. Each enum parses from and
//! displays as its wire string, so string tags never leak past normalization.

use serde::{Deserialize, Serialize};

/// Implements `as_str`, `Display` and `FromStr` from a variant/wire-string table.
macro_rules! wire_strings {
    ($ty:ident, $label:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire representation used by the REST API.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", $label, ": {}"), s)),
                }
            }
        }
    };
}

/// Stock level bucket derived from a product's stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    #[default]
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    /// Stock below this count is reported as low.
    pub const LOW_STOCK_THRESHOLD: u32 = 5;

    /// Bucket a stock count: 0 is out, 1-4 is low, 5+ is in stock.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else if stock < Self::LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

wire_strings!(StockStatus, "stock status" {
    OutOfStock => "out-of-stock",
    LowStock => "low-stock",
    InStock => "in-stock",
});

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

wire_strings!(OrderStatus, "order status" {
    Pending => "pending",
    Processing => "processing",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

/// Review moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    #[default]
    Pending,
    Flagged,
}

wire_strings!(ReviewStatus, "review status" {
    Approved => "approved",
    Pending => "pending",
    Flagged => "flagged",
});

/// Coupon activation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CouponStatus {
    Active,
    #[default]
    Inactive,
    Expired,
}

wire_strings!(CouponStatus, "coupon status" {
    Active => "active",
    Inactive => "inactive",
    Expired => "expired",
});

/// How a coupon's discount value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    #[default]
    Percentage,
    Fixed,
}

wire_strings!(DiscountKind, "discount kind" {
    Percentage => "percentage",
    Fixed => "fixed",
});

/// Payment method recorded on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Paypal,
    #[default]
    Cod,
}

wire_strings!(PaymentMethod, "payment method" {
    Card => "card",
    Paypal => "paypal",
    Cod => "cod",
});

/// Storefront user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

wire_strings!(UserRole, "user role" {
    Customer => "customer",
    Admin => "admin",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_partition() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(4), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(5), StockStatus::InStock);
        assert_eq!(StockStatus::from_stock(500), StockStatus::InStock);
    }

    #[test]
    fn test_stock_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock).unwrap(),
            "\"out-of-stock\""
        );
        assert_eq!(StockStatus::LowStock.to_string(), "low-stock");
    }

    #[test]
    fn test_order_status_parse_is_case_insensitive() {
        assert_eq!("Shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_parse_error_names_the_type() {
        let err = "nope".parse::<ReviewStatus>().unwrap_err();
        assert_eq!(err, "invalid review status: nope");
    }

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Customer, UserRole::Admin] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }
}
