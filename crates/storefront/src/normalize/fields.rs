//! Lenient field readers for raw API records.
//!
//! The API is loosely typed: numbers arrive as numbers or numeric strings,
//! lists as arrays or comma-separated strings, IDs as `_id`, `id`, or Mongo
//! extended JSON. Every reader returns `None` (or an empty value) instead of
//! failing, so normalizers stay total.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};

pub type Object = Map<String, Value>;

/// Record identity: `_id`, then `id`. Accepts strings, numbers and `{"$oid": ".."}`.
pub fn id(obj: &Object) -> String {
    ["_id", "id"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(id_value))
        .unwrap_or_default()
}

fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(inner) => inner.get("$oid").and_then(id_value),
        _ => None,
    }
}

/// Reference to another record, which may be embedded (populated) or a bare ID.
pub fn reference_id(obj: &Object, key: &str) -> String {
    match obj.get(key) {
        Some(Value::Object(inner)) => id(inner),
        Some(other) => id_value(other).unwrap_or_default(),
        None => String::new(),
    }
}

/// Trimmed, non-empty string. Numbers and booleans are stringified.
pub fn string(obj: &Object, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First non-empty string among `keys`.
pub fn string_any(obj: &Object, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| string(obj, key))
}

/// Decimal from a JSON number or numeric string (`"49.99"`, `" 10 "`).
pub fn decimal(obj: &Object, key: &str) -> Option<Decimal> {
    decimal_value(obj.get(key)?)
}

pub fn decimal_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    }
}

/// Non-negative whole count. Fractions are truncated, negatives clamp to 0.
pub fn count(obj: &Object, key: &str) -> Option<u32> {
    let value = decimal(obj, key)?;
    if value.is_sign_negative() {
        return Some(0);
    }
    Some(value.trunc().to_u32().unwrap_or(u32::MAX))
}

/// Floating point value, for ratings and other non-monetary figures.
pub fn float(obj: &Object, key: &str) -> Option<f64> {
    decimal(obj, key)?.to_f64().filter(|f| f.is_finite())
}

/// Boolean from `true`/`false`, `"true"`/`"false"`, or 1/0.
pub fn boolean(obj: &Object, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

/// List of strings from an array or a comma-separated string.
///
/// Array elements may be objects carrying a `url` (images) or `name`.
/// Blank entries are dropped and duplicates removed, keeping first occurrence.
pub fn string_list(obj: &Object, key: &str) -> Vec<String> {
    let items: Vec<String> = match obj.get(key) {
        Some(Value::Array(values)) => values.iter().filter_map(list_item).collect(),
        Some(Value::String(s)) => s.split(',').map(|part| part.trim().to_owned()).collect(),
        _ => Vec::new(),
    };

    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_empty() && !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

fn list_item(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(inner) => string_any(inner, &["url", "secure_url", "name", "value"]),
        _ => None,
    }
}

/// Timestamp from RFC 3339, a bare `YYYY-MM-DD` date, or epoch milliseconds.
pub fn timestamp(obj: &Object, key: &str) -> Option<DateTime<Utc>> {
    match obj.get(key)? {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(inner) => inner
            .get("$date")
            .and_then(Value::as_str)
            .and_then(parse_timestamp),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Nested object, if present.
pub fn object<'a>(obj: &'a Object, key: &str) -> Option<&'a Object> {
    obj.get(key)?.as_object()
}

/// Nested array, if present.
pub fn array<'a>(obj: &'a Object, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_id_variants() {
        assert_eq!(id(&obj(json!({"_id": "a1", "id": "b2"}))), "a1");
        assert_eq!(id(&obj(json!({"id": 42}))), "42");
        assert_eq!(id(&obj(json!({"_id": {"$oid": "65ab"}}))), "65ab");
        assert_eq!(id(&obj(json!({"_id": null}))), "");
    }

    #[test]
    fn test_decimal_from_number_and_string() {
        let o = obj(json!({"a": 49.99, "b": " 99.99 ", "c": "n/a", "d": null}));
        assert_eq!(decimal(&o, "a"), Some(Decimal::new(4999, 2)));
        assert_eq!(decimal(&o, "b"), Some(Decimal::new(9999, 2)));
        assert_eq!(decimal(&o, "c"), None);
        assert_eq!(decimal(&o, "d"), None);
        assert_eq!(decimal(&o, "missing"), None);
    }

    #[test]
    fn test_count_clamps() {
        let o = obj(json!({"neg": -3, "frac": "2.7", "str": "0"}));
        assert_eq!(count(&o, "neg"), Some(0));
        assert_eq!(count(&o, "frac"), Some(2));
        assert_eq!(count(&o, "str"), Some(0));
    }

    #[test]
    fn test_string_list_shapes() {
        let o = obj(json!({
            "arr": ["Red", " Blue ", "", "Red"],
            "csv": "S, M,L",
            "imgs": [{"url": "a.jpg"}, "b.jpg", null],
            "bad": 5
        }));
        assert_eq!(string_list(&o, "arr"), vec!["Red", "Blue"]);
        assert_eq!(string_list(&o, "csv"), vec!["S", "M", "L"]);
        assert_eq!(string_list(&o, "imgs"), vec!["a.jpg", "b.jpg"]);
        assert!(string_list(&o, "bad").is_empty());
    }

    #[test]
    fn test_timestamp_formats() {
        let o = obj(json!({
            "iso": "2024-05-01T10:00:00Z",
            "date": "2024-05-01",
            "millis": 1_714_557_600_000_i64,
            "junk": "yesterday"
        }));
        let iso = timestamp(&o, "iso").unwrap();
        assert_eq!(iso.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert_eq!(
            timestamp(&o, "date").unwrap().to_rfc3339(),
            "2024-05-01T00:00:00+00:00"
        );
        assert_eq!(timestamp(&o, "millis").unwrap(), iso);
        assert!(timestamp(&o, "junk").is_none());
    }

    #[test]
    fn test_boolean_lenient() {
        let o = obj(json!({"a": "true", "b": 0, "c": "maybe"}));
        assert_eq!(boolean(&o, "a"), Some(true));
        assert_eq!(boolean(&o, "b"), Some(false));
        assert_eq!(boolean(&o, "c"), None);
    }
}
