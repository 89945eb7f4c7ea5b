//! REST resources exposed by the storefront API.

use serde::{Deserialize, Serialize};

/// A REST resource family.
///
/// Every fetch, normalization and invalidation is tagged with one of these
/// instead of a free-form name, so dispatch is checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Products,
    Orders,
    Reviews,
    Coupons,
    Categories,
    Users,
}

impl Resource {
    /// All resources, in display order.
    pub const ALL: [Self; 6] = [
        Self::Products,
        Self::Orders,
        Self::Reviews,
        Self::Coupons,
        Self::Categories,
        Self::Users,
    ];

    /// Canonical (plural) name, also used as the list query key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Reviews => "reviews",
            Self::Coupons => "coupons",
            Self::Categories => "categories",
            Self::Users => "users",
        }
    }

    /// Singular noun for user-facing messages.
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Products => "product",
            Self::Orders => "order",
            Self::Reviews => "review",
            Self::Coupons => "coupon",
            Self::Categories => "category",
            Self::Users => "user",
        }
    }

    /// Path of the collection endpoint.
    #[must_use]
    pub const fn list_path(self) -> &'static str {
        match self {
            Self::Products => "/api/products",
            Self::Orders => "/api/orders",
            Self::Reviews => "/api/reviews",
            Self::Coupons => "/api/coupons",
            Self::Categories => "/api/categories",
            Self::Users => "/api/users",
        }
    }

    /// Path of a single record's endpoint.
    #[must_use]
    pub fn detail_path(self, id: &str) -> String {
        format!("{}/{id}", self.list_path())
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == lower || r.singular() == lower)
            .ok_or_else(|| format!("unknown resource: {s}"))
    }
}
