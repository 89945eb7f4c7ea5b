//! Query cache, observers and mutations.
//!
//! - [`QueryKey`] canonicalizes request paths so equivalent list requests
//!   share one cache entry.
//! - [`CacheClass`] picks one of four fixed [`CachePolicy`] profiles.
//! - [`QueryClient`] owns the cache and guarantees at most one in-flight
//!   request per key.
//! - [`DataQuery`] is a per-view observer publishing [`QueryState`] on a
//!   watch channel.
//! - [`Mutation`] performs writes and invalidates the affected resource.

mod client;
mod key;
mod mutation;
mod observer;
mod policy;

pub use client::{CachedQuery, FetchMode, QueryClient};
pub use key::QueryKey;
pub use mutation::{Mutation, MutationError};
pub use observer::{DataQuery, DataRequest, QueryState};
pub use policy::{CacheClass, CachePolicy, QueryOverrides};
