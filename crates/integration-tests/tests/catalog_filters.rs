//! Mock catalog served over HTTP, normalized and filtered.
//!
//! Run with: cargo test -p threadline-integration-tests

use httpmock::MockServer;
use rust_decimal::Decimal;
use serde_json::Value;
use threadline_integration_tests::client_for;
use threadline_storefront::filters::{self, FilterAction, PriceRange, ProductFilters, SortBy};
use threadline_storefront::mock::MockCatalog;
use threadline_storefront::models::Product;
use threadline_storefront::normalize::Normalized;
use threadline_storefront::query::{CacheClass, DataQuery, DataRequest};
use threadline_storefront::resource::Resource;

async fn served_products(catalog: &MockCatalog) -> Vec<Product> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/products");
        then.status(200).json_body(Value::Array(catalog.products.clone()));
    });

    let query = DataQuery::new(
        client_for(&server),
        DataRequest::list(Resource::Products, CacheClass::Static),
    );
    let state = query.load().await;
    match state.data.as_deref() {
        Some(Normalized::Products(products)) => products.clone(),
        other => panic!("unexpected data: {other:?}"),
    }
}

#[tokio::test]
async fn test_every_mock_product_normalizes() {
    let catalog = MockCatalog::generate(3, 40);
    let products = served_products(&catalog).await;

    assert_eq!(products.len(), 40);
    for product in &products {
        assert!(!product.id.as_str().is_empty());
        assert_eq!(product.is_in_stock, product.stock > 0);
        assert!(product.original_price.is_none_or(|original| original > product.price));
        assert_eq!(product.is_on_sale(), product.original_price.is_some());
    }
}

#[tokio::test]
async fn test_filters_over_fetched_catalog() {
    let catalog = MockCatalog::generate(11, 60);
    let products = served_products(&catalog).await;

    let actions = [
        FilterAction::SetPriceRange(PriceRange::new(Decimal::new(20, 0), Decimal::new(150, 0))),
        FilterAction::SetInStock(true),
        FilterAction::ToggleColor("Blue".into()),
        FilterAction::ToggleColor("Black".into()),
        FilterAction::SetSortBy(SortBy::PriceAsc),
    ];
    let state = actions
        .into_iter()
        .fold(ProductFilters::default(), filters::reduce);

    let matched = filters::apply(&state, &products);
    assert!(matched.len() <= products.len());
    for product in &matched {
        assert!(state.price_range.contains(product.price));
        assert!(product.stock > 0);
        assert!(product.colors.iter().any(|c| c == "Blue" || c == "Black"));
    }
    assert!(matched.windows(2).all(|pair| pair[0].price <= pair[1].price));

    let expected = products.iter().filter(|p| state.matches(p)).count();
    assert_eq!(matched.len(), expected);

    // The URL form reproduces the same result.
    let from_url = ProductFilters::from_query_string(&state.to_query_string());
    assert_eq!(from_url, state);
    assert_eq!(filters::apply(&from_url, &products), matched);
}

#[tokio::test]
async fn test_clear_all_shows_whole_catalog_in_order() {
    let catalog = MockCatalog::generate(5, 25);
    let products = served_products(&catalog).await;

    let state = filters::reduce(
        ProductFilters {
            search: "nothing matches this".into(),
            sort_by: SortBy::Newest,
            ..ProductFilters::default()
        },
        FilterAction::ClearAll,
    );
    assert_eq!(state.sort_by, SortBy::Newest);

    let matched = filters::apply(&state, &products);
    assert_eq!(matched.len(), products.len());
    assert!(matched.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
}
