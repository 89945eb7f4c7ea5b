//! Threadline Core - value types for storefront records.
//!
//! Used by `threadline-storefront` (fetching, caching, normalization,
//! filtering) and the `threadline` CLI. Nothing here performs I/O; every
//! type is plain data with parsing and formatting helpers.
//!
//! - [`types::id`] - string-backed record identifiers
//! - [`types::price`] - money amounts and discount math
//! - [`types::email`] - canonicalized email addresses
//! - [`types::status`] - stock, order, review, coupon, payment and role enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
