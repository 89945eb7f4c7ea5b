//! Storefront users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threadline_core::{Email, UserId, UserRole};

use super::Address;

/// A normalized user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<Email>,
    pub role: UserRole,
    pub is_admin: bool,
    /// Up to two uppercase initials for the avatar placeholder.
    pub initials: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub created_at: Option<DateTime<Utc>>,
}
