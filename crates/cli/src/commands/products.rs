//! Fetch the product listing and filter it locally.

use threadline_storefront::config::StorefrontConfig;
use threadline_storefront::filters::{self, FilterAction, PriceRange, ProductFilters, reduce};
use threadline_storefront::normalize::Normalized;
use threadline_storefront::query::{CacheClass, DataQuery, DataRequest, QueryClient};
use threadline_storefront::resource::Resource;
use tracing::info;

use super::print_json;
use crate::ProductArgs;

/// Fetch `/api/products`, apply the filters from `args`, print the matches.
///
/// # Errors
///
/// Returns an error if configuration is missing, the fetch fails, or the
/// payload is not a product list.
pub async fn run(args: ProductArgs) -> Result<(), Box<dyn std::error::Error>> {
    let filters = build_filters(args);
    info!(active = filters.active_count(), sort = %filters.sort_by, "Filtering products");

    let config = StorefrontConfig::from_env()?;
    let client = QueryClient::from_config(&config)?;
    let query = DataQuery::new(client, DataRequest::list(Resource::Products, CacheClass::Static));

    let state = query.load().await;
    if let Some(error) = state.error {
        return Err(format!("Failed to load products: {error}").into());
    }

    let products = match state.data.as_deref() {
        Some(Normalized::Products(products)) => products.as_slice(),
        Some(_) => return Err("Products endpoint did not return a list".into()),
        None => &[],
    };

    let matched = filters::apply(&filters, products);
    info!(
        total = products.len(),
        matched = matched.len(),
        query = %filters.to_query_string(),
        "Filtered products"
    );
    print_json(&matched)
}

/// Start from `--query`, then apply each flag as a reducer action.
fn build_filters(args: ProductArgs) -> ProductFilters {
    let mut filters = args
        .query
        .as_deref()
        .map(ProductFilters::from_query_string)
        .unwrap_or_default();

    let mut actions = Vec::new();
    if let Some(search) = args.search {
        actions.push(FilterAction::SetSearch(search));
    }
    if let Some(category) = args.category {
        actions.push(FilterAction::SetCategory(category));
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        actions.push(FilterAction::SetPriceRange(PriceRange::new(
            args.min_price.unwrap_or(filters.price_range.min),
            args.max_price.unwrap_or(filters.price_range.max),
        )));
    }
    if !args.colors.is_empty() {
        actions.push(FilterAction::SetColors(args.colors));
    }
    if !args.sizes.is_empty() {
        actions.push(FilterAction::SetSizes(args.sizes));
    }
    if let Some(style) = args.style {
        actions.push(FilterAction::SetStyle(style));
    }
    if args.in_stock {
        actions.push(FilterAction::SetInStock(true));
    }
    if let Some(sort) = args.sort {
        actions.push(FilterAction::SetSortBy(sort));
    }

    for action in actions {
        filters = reduce(filters, action);
    }
    filters
}
