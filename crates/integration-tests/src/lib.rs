//! Integration tests for the Threadline data layer.
//!
//! Every test starts an `httpmock` server standing in for the storefront REST
//! API and drives the real HTTP client, cache and observers against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p threadline-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `query_cache` - Deduplication, staleness, retries and error state
//! - `mutations` - Writes, error messages and cache invalidation
//! - `catalog_filters` - Mock catalog served over HTTP, normalized and filtered

use httpmock::MockServer;
use serde_json::{Value, json};
use threadline_storefront::config::StorefrontConfig;
use threadline_storefront::query::QueryClient;

/// Bearer token the test client sends.
pub const TEST_TOKEN: &str = "test-token";

/// Query client pointed at `server`.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client_for(server: &MockServer) -> QueryClient {
    let config = StorefrontConfig::new(server.base_url()).with_token(TEST_TOKEN);
    QueryClient::from_config(&config).expect("Failed to build query client")
}

/// Raw product in the API's loose shape.
#[must_use]
pub fn raw_product(id: &str, name: &str, price: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "price": price,
        "stock": "7",
        "colors": ["Black"],
        "category": {"_id": "c1", "name": "Jeans"},
    })
}
