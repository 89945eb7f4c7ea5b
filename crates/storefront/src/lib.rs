//! Threadline storefront data layer.
//!
//! Fetches catalog, order, review, coupon and user data from the storefront
//! REST API, caches it per canonical query key, normalizes raw payloads into
//! the [`models`], and filters product listings client-side.
//!
//! # Example
//!
//! ```no_run
//! use threadline_storefront::config::StorefrontConfig;
//! use threadline_storefront::query::{CacheClass, DataQuery, DataRequest, QueryClient};
//! use threadline_storefront::resource::Resource;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorefrontConfig::from_env()?;
//! let client = QueryClient::from_config(&config)?;
//!
//! let products = DataQuery::new(
//!     client.clone(),
//!     DataRequest::list(Resource::Products, CacheClass::Static),
//! );
//! let state = products.load().await;
//! println!("{} products", state.count());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod filters;
pub mod mock;
pub mod models;
pub mod normalize;
pub mod query;
pub mod resource;

pub use api::{ApiClient, ApiError};
pub use config::{ConfigError, StorefrontConfig};
pub use normalize::{NormalizeError, Normalized};
pub use query::{
    CacheClass, CachePolicy, DataQuery, DataRequest, Mutation, MutationError, QueryClient,
    QueryKey, QueryState,
};
pub use resource::Resource;
