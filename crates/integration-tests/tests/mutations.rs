//! Mutations: error messages and cache invalidation.
//!
//! Run with: cargo test -p threadline-integration-tests

use httpmock::MockServer;
use rust_decimal::Decimal;
use serde_json::json;
use threadline_integration_tests::{client_for, raw_product};
use threadline_storefront::normalize::Normalized;
use threadline_storefront::query::{CacheClass, DataQuery, DataRequest, Mutation};
use threadline_storefront::resource::Resource;

#[tokio::test]
async fn test_add_returns_normalized_record() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/products")
            .json_body_includes(r#"{"name":"Linen Shirt"}"#);
        then.status(201)
            .json_body(raw_product("p9", "Linen Shirt", "45.00"));
    });

    let mutation = Mutation::new(client_for(&server), Resource::Products);
    let created = mutation
        .add("/api/products", &json!({"name": "Linen Shirt", "price": 45}))
        .await
        .expect("add succeeds");

    mock.assert();
    match created {
        Normalized::Product(product) => {
            assert_eq!(product.id.as_str(), "p9");
            assert_eq!(product.price, Decimal::new(45, 0));
            assert_eq!(product.slug, "linen-shirt");
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_message_is_passed_through() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST").path("/api/coupons");
        then.status(400)
            .json_body(json!({"error": "Coupon code already exists", "message": "ignored"}));
    });

    let mutation = Mutation::new(client_for(&server), Resource::Coupons);
    let err = mutation
        .add("/api/coupons", &json!({"code": "SUMMER20"}))
        .await
        .expect_err("add fails");

    // Writes are never retried.
    mock.assert_calls(1);
    assert_eq!(err.message, "Coupon code already exists");
    assert_eq!(err.to_string(), "Coupon code already exists");
    assert_eq!(err.source.as_ref().and_then(|e| e.status()), Some(400));
}

#[tokio::test]
async fn test_message_field_is_used_when_error_is_absent() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("PATCH").path("/api/orders/o1");
        then.status(422).json_body(json!({"message": "Order already shipped"}));
    });

    let mutation = Mutation::new(client_for(&server), Resource::Orders);
    let err = mutation
        .update("/api/orders/o1", &json!({"status": "cancelled"}))
        .await
        .expect_err("update fails");

    assert_eq!(err.message, "Order already shipped");
}

#[tokio::test]
async fn test_generic_message_without_server_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("DELETE").path("/api/reviews/r1");
        then.status(500);
    });

    let mutation = Mutation::new(client_for(&server), Resource::Reviews);
    let err = mutation.delete("/api/reviews/r1").await.expect_err("delete fails");

    assert_eq!(err.message, "Failed to delete review");
    assert!(err.source.is_some());
}

#[tokio::test]
async fn test_transport_failure_uses_generic_message() {
    // Nothing listens on the discard port.
    let config = threadline_storefront::config::StorefrontConfig::new("http://127.0.0.1:9");
    let client = threadline_storefront::query::QueryClient::from_config(&config)
        .expect("Failed to build query client");

    let err = Mutation::new(client, Resource::Categories)
        .add("/api/categories", &json!({"name": "Hats"}))
        .await
        .expect_err("add fails");

    assert_eq!(err.message, "Failed to add category");
    assert!(matches!(
        err.source,
        Some(threadline_storefront::api::ApiError::Http(_))
    ));
}

#[tokio::test]
async fn test_empty_delete_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("DELETE").path("/api/coupons/c1");
        then.status(204);
    });

    let mutation = Mutation::new(client_for(&server), Resource::Coupons);
    let result = mutation.delete("/api/coupons/c1").await.expect("delete succeeds");

    assert_eq!(result, Normalized::Raw(serde_json::Value::Null));
}

#[tokio::test]
async fn test_success_invalidates_resource_entries() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method("GET").path("/api/products");
        then.status(200).json_body(json!([raw_product("p1", "Tee", "10")]));
    });
    let detail = server.mock(|when, then| {
        when.method("GET").path("/api/products/p1");
        then.status(200).json_body(raw_product("p1", "Tee", "10"));
    });
    let orders = server.mock(|when, then| {
        when.method("GET").path("/api/orders");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method("PATCH").path("/api/products/p1");
        then.status(200).json_body(raw_product("p1", "Tee", "12"));
    });

    let client = client_for(&server);
    let products = DataQuery::new(
        client.clone(),
        DataRequest::list(Resource::Products, CacheClass::Static),
    );
    let product = DataQuery::new(
        client.clone(),
        DataRequest::detail(Resource::Products, "p1", CacheClass::Static),
    );
    let order_list = DataQuery::new(
        client.clone(),
        DataRequest::list(Resource::Orders, CacheClass::Static),
    );
    products.load().await;
    product.load().await;
    order_list.load().await;

    Mutation::new(client, Resource::Products)
        .update("/api/products/p1", &json!({"price": 12}))
        .await
        .expect("update succeeds");

    products.load().await;
    product.load().await;
    order_list.load().await;

    list.assert_calls(2);
    detail.assert_calls(2);
    // Other resources keep their entries.
    orders.assert_calls(1);
}
