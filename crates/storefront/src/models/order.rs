//! Customer orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use threadline_core::{Email, OrderId, OrderStatus, PaymentMethod, ProductId};

use super::Address;

/// One line of an order, with the price captured at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl OrderItem {
    /// `price * quantity`, or `None` when that overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Customer details as they were when the order was placed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub name: String,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

/// Monetary totals for an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// A normalized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub customer: CustomerSnapshot,
    pub payment_method: PaymentMethod,
    pub summary: OrderSummary,
    pub status: OrderStatus,
    /// Sum of item quantities.
    pub total_items: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Orders can be cancelled until they leave the warehouse.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Processing)
    }
}
