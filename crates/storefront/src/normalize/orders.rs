//! Order normalization.

use rust_decimal::Decimal;
use serde_json::Value;

use threadline_core::{Email, OrderId, ProductId};

use super::fields::{self, Object};
use crate::models::{Address, CustomerSnapshot, Order, OrderItem, OrderSummary};

/// Normalize one raw order. Returns `None` when `raw` is not an object.
#[must_use]
pub fn normalize_order(raw: &Value) -> Option<Order> {
    let obj = raw.as_object()?;

    let items: Vec<OrderItem> = ["items", "orderItems"]
        .iter()
        .map(|key| fields::array(obj, key))
        .find(|items| !items.is_empty())
        .unwrap_or_default()
        .iter()
        .filter_map(normalize_item)
        .collect();

    let total_items = items
        .iter()
        .fold(0_u32, |total, item| total.saturating_add(item.quantity));
    let summary = normalize_summary(obj, &items);

    Some(Order {
        id: OrderId::new(fields::id(obj)),
        customer: normalize_customer(obj),
        payment_method: fields::string(obj, "paymentMethod")
            .and_then(|m| m.parse().ok())
            .unwrap_or_default(),
        status: fields::string(obj, "status")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        created_at: fields::timestamp(obj, "createdAt"),
        items,
        summary,
        total_items,
    })
}

/// Normalize a list of raw orders, dropping non-object entries.
#[must_use]
pub fn normalize_orders(raw: &[Value]) -> Vec<Order> {
    raw.iter().filter_map(normalize_order).collect()
}

fn normalize_item(raw: &Value) -> Option<OrderItem> {
    let obj = raw.as_object()?;
    let product = fields::object(obj, "product");

    let name = fields::string(obj, "name")
        .or_else(|| product.and_then(|p| fields::string(p, "name")))
        .unwrap_or_default();
    let image = fields::string(obj, "image").or_else(|| {
        product.and_then(|p| fields::string_list(p, "images").into_iter().next())
    });

    Some(OrderItem {
        product_id: ProductId::new(fields::reference_id(obj, "product")),
        name,
        image,
        quantity: fields::count(obj, "quantity").unwrap_or(1),
        price: fields::decimal(obj, "price")
            .or_else(|| product.and_then(|p| fields::decimal(p, "price")))
            .unwrap_or(Decimal::ZERO),
        color: fields::string(obj, "color"),
        size: fields::string(obj, "size"),
    })
}

/// Uses the API's totals when present; otherwise derives the subtotal from
/// the line items and treats missing shipping/tax as zero. Derived figures
/// that overflow fall back to zero.
fn normalize_summary(obj: &Object, items: &[OrderItem]) -> OrderSummary {
    let source = fields::object(obj, "summary").unwrap_or(obj);

    let subtotal = fields::decimal(source, "subtotal")
        .or_else(|| {
            items.iter().try_fold(Decimal::ZERO, |sum, item| {
                sum.checked_add(item.line_total()?)
            })
        })
        .unwrap_or(Decimal::ZERO);
    let shipping = fields::decimal(source, "shipping").unwrap_or(Decimal::ZERO);
    let tax = fields::decimal(source, "tax").unwrap_or(Decimal::ZERO);
    let total = fields::decimal(source, "total")
        .or_else(|| fields::decimal(obj, "totalAmount"))
        .or_else(|| subtotal.checked_add(shipping)?.checked_add(tax))
        .unwrap_or(Decimal::ZERO);

    OrderSummary {
        subtotal,
        shipping,
        tax,
        total,
    }
}

fn normalize_customer(obj: &Object) -> CustomerSnapshot {
    let customer = ["customer", "shippingAddress", "user"]
        .iter()
        .find_map(|key| fields::object(obj, key));
    let Some(customer) = customer else {
        return CustomerSnapshot::default();
    };

    let address_source = fields::object(customer, "address").unwrap_or(customer);
    let address = normalize_address(address_source);

    CustomerSnapshot {
        name: fields::string_any(customer, &["name", "fullName"]).unwrap_or_default(),
        email: fields::string(customer, "email").and_then(|e| Email::parse(&e).ok()),
        phone: fields::string(customer, "phone"),
        address: (!address.is_empty()).then_some(address),
    }
}

pub(super) fn normalize_address(obj: &Object) -> Address {
    Address {
        street: fields::string_any(obj, &["street", "address"]).unwrap_or_default(),
        city: fields::string(obj, "city").unwrap_or_default(),
        state: fields::string(obj, "state").unwrap_or_default(),
        zip_code: fields::string_any(obj, &["zipCode", "postalCode", "zip"]).unwrap_or_default(),
        country: fields::string(obj, "country").unwrap_or_default(),
    }
}
