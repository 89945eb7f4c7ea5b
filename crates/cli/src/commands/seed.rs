//! Generate a mock catalog in the raw API shape.

use threadline_storefront::mock::MockCatalog;
use tracing::info;

use super::print_json;

/// Generate `count` products (plus categories, reviews and orders) and write
/// them to `out`, or stdout.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub async fn run(
    count: usize,
    seed: u64,
    out: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = MockCatalog::generate(seed, count);
    info!(
        seed,
        products = catalog.products.len(),
        categories = catalog.categories.len(),
        reviews = catalog.reviews.len(),
        orders = catalog.orders.len(),
        "Generated mock catalog"
    );

    match out {
        Some(path) => {
            let json = serde_json::to_string_pretty(&catalog)?;
            tokio::fs::write(path, json).await?;
            info!(path = %path, "Wrote mock catalog");
            Ok(())
        }
        None => print_json(&catalog),
    }
}
