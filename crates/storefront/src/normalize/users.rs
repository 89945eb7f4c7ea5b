//! User normalization.

use serde_json::Value;

use threadline_core::{Email, UserId, UserRole};

use super::fields;
use super::initials;
use super::orders::normalize_address;
use crate::models::User;

/// Normalize one raw user. Returns `None` when `raw` is not an object.
#[must_use]
pub fn normalize_user(raw: &Value) -> Option<User> {
    let obj = raw.as_object()?;

    let name = fields::string(obj, "name")
        .or_else(|| {
            let first = fields::string(obj, "firstName").unwrap_or_default();
            let last = fields::string(obj, "lastName").unwrap_or_default();
            let joined = format!("{first} {last}").trim().to_string();
            (!joined.is_empty()).then_some(joined)
        })
        .unwrap_or_default();

    // Some endpoints send `isAdmin` instead of a role.
    let role = fields::string(obj, "role")
        .and_then(|r| r.parse().ok())
        .or_else(|| {
            fields::boolean(obj, "isAdmin")
                .map(|admin| if admin { UserRole::Admin } else { UserRole::Customer })
        })
        .unwrap_or_default();

    let address = fields::object(obj, "address")
        .map(normalize_address)
        .filter(|address| !address.is_empty());

    Some(User {
        id: UserId::new(fields::id(obj)),
        email: fields::string(obj, "email").and_then(|e| Email::parse(&e).ok()),
        role,
        is_admin: role == UserRole::Admin,
        initials: initials(&name),
        avatar: fields::string_any(obj, &["avatar", "image", "photo"]),
        phone: fields::string(obj, "phone"),
        address,
        created_at: fields::timestamp(obj, "createdAt"),
        name,
    })
}

/// Normalize a list of raw users, dropping non-object entries.
#[must_use]
pub fn normalize_users(raw: &[Value]) -> Vec<User> {
    raw.iter().filter_map(normalize_user).collect()
}
