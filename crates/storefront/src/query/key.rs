//! Canonical query keys.

use std::fmt;

use crate::resource::Resource;

/// Cache identifier derived from a request path.
///
/// Collection endpoints collapse onto the resource name (`/api/products` and
/// `/api/products/` both become `products`). Anything else, including detail
/// paths and paths with a query string, keeps the path itself as its key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    /// Resolve the canonical key for `path`.
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Self(path.to_owned());
        }

        Resource::ALL
            .into_iter()
            .find(|resource| resource.list_path() == trimmed)
            .map_or_else(|| Self(trimmed.to_owned()), Self::for_resource)
    }

    /// Key of a resource's collection endpoint.
    #[must_use]
    pub fn for_resource(resource: Resource) -> Self {
        Self(resource.as_str().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths_collapse() {
        for resource in Resource::ALL {
            assert_eq!(
                QueryKey::resolve(resource.list_path()).as_str(),
                resource.as_str()
            );
        }
        assert_eq!(QueryKey::resolve("/api/products/"), QueryKey::for_resource(Resource::Products));
    }

    #[test]
    fn test_detail_paths_keep_their_own_key() {
        let key = QueryKey::resolve("/api/users/42");
        assert_eq!(key.as_str(), "/api/users/42");
        assert_ne!(key, QueryKey::for_resource(Resource::Users));
    }

    #[test]
    fn test_unknown_paths_pass_through() {
        assert_eq!(QueryKey::resolve("/api/wishlist").as_str(), "/api/wishlist");
        assert_eq!(
            QueryKey::resolve("/api/products?page=2").as_str(),
            "/api/products?page=2"
        );
        assert_eq!(QueryKey::resolve("/").as_str(), "/");
    }
}
