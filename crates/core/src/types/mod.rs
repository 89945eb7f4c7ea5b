//! Value types shared by the storefront data layer and the CLI.
//!
//! IDs, prices, emails and the status enums the REST API sends as strings.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, discount_percent};
pub use status::*;
