//! HTTP-level tests for the storefront API against the mock providers.
//!
//! Each test drives the full router (extractors, auth, handlers, error
//! mapping) with `tower::ServiceExt::oneshot`, asserting on status codes
//! and JSON bodies the way a client would see them.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use stitch_core::config::PricingPolicy;
use stitch_core::mocks::{
    MockAuthenticator, MockCartStore, MockCatalogStore, MockOrderLedger, MockStatsProvider,
    MockUserDirectory,
};
use stitch_core::model::Product;
use stitch_core::test_fixtures::product_named;
use stitch_web::{app, AppState};
use tower::ServiceExt;

/// Everything a test needs to seed state and drive the API.
struct Harness {
    app: Router,
    auth: MockAuthenticator,
    catalog: MockCatalogStore,
    cart: MockCartStore,
    ledger: MockOrderLedger,
}

fn harness() -> Harness {
    let auth = MockAuthenticator::new();
    let catalog = MockCatalogStore::new();
    let cart = MockCartStore::with_catalog(&catalog);
    let users = MockUserDirectory::new();
    let ledger = MockOrderLedger::new(&catalog, &cart, &users);
    let stats = MockStatsProvider::new();

    let state = AppState::new(
        auth.clone(),
        catalog.clone(),
        cart.clone(),
        ledger.clone(),
        users,
        stats,
        PricingPolicy::default(),
    );

    Harness {
        app: app(state),
        auth,
        catalog,
        cart,
        ledger,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

fn with_json(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn seed_product(harness: &Harness, name: &str, price_cents: i64, stock: i32) -> Product {
    let mut product = product_named(name);
    product.price = Decimal::new(price_cents, 2);
    product.stock_quantity = stock;
    harness.catalog.insert_product(product.clone());
    product
}

#[tokio::test]
async fn test_products_are_public_and_filterable() {
    let h = harness();
    let mut featured = product_named("Featured Jacket");
    featured.is_featured = true;
    h.catalog.insert_product(featured);
    seed_product(&h, "Plain Tee", 500, 5);

    let (status, body) = send(&h.app, get("/api/v1/products", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) = send(&h.app, get("/api/v1/products?featured=true", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "Featured Jacket");
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let h = harness();
    let (status, body) = send(
        &h.app,
        get(
            "/api/v1/products/00000000-0000-0000-0000-000000000000",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_cart_requires_token() {
    let h = harness();

    let (status, _) = send(&h.app, get("/api/v1/cart", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&h.app, get("/api/v1/cart", Some("nope"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_full_purchase_flow() {
    let h = harness();
    h.auth.grant_user("shopper");
    let product = seed_product(&h, "Denim Jacket", 1000, 5);

    // Add two units to the cart
    let (status, body) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/cart",
            Some("shopper"),
            &json!({ "productId": product.id.0, "quantity": 2 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product added to cart");

    let (status, body) = send(&h.app, get("/api/v1/cart", Some("shopper"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["quantity"], 2);

    // Place the order
    let (status, body) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/orders",
            Some("shopper"),
            &json!({
                "items": [{ "product_id": product.id.0, "quantity": 2, "price": "10.00" }],
                "totalAmount": "20.00",
                "shippingAddress": "123 Main St",
                "paymentMethod": "card"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order created successfully");
    let order_id = body["orderId"].as_str().expect("order id").to_string();

    // Stock decremented, cart cleared
    assert_eq!(h.catalog.stock_of(product.id), Some(3));
    let (_, cart_body) = send(&h.app, get("/api/v1/cart", Some("shopper"))).await;
    assert_eq!(cart_body.as_array().map(Vec::len), Some(0));

    // Order visible with the price snapshot
    let (status, body) = send(
        &h.app,
        get(&format!("/api/v1/orders/{order_id}"), Some("shopper")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["items"][0]["price"], "10.00");

    // But not to another authenticated user
    h.auth.grant_user("other");
    let (status, _) = send(
        &h.app,
        get(&format!("/api/v1/orders/{order_id}"), Some("other")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversell_answers_conflict() {
    let h = harness();
    h.auth.grant_user("shopper");
    let product = seed_product(&h, "Limited Sneaker", 1000, 2);

    let (status, body) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/orders",
            Some("shopper"),
            &json!({
                "items": [{ "product_id": product.id.0, "quantity": 3 }],
                "totalAmount": "30.00",
                "shippingAddress": "123 Main St",
                "paymentMethod": "card"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // No partial effects
    assert_eq!(h.catalog.stock_of(product.id), Some(2));
    assert_eq!(h.ledger.order_count(), 0);
}

#[tokio::test]
async fn test_total_mismatch_answers_bad_request() {
    let h = harness();
    h.auth.grant_user("shopper");
    let product = seed_product(&h, "Priced Boot", 1000, 5);

    let (status, body) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/orders",
            Some("shopper"),
            &json!({
                "items": [{ "product_id": product.id.0, "quantity": 2 }],
                "totalAmount": "15.00",
                "shippingAddress": "123 Main St",
                "paymentMethod": "card"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(h.catalog.stock_of(product.id), Some(5));
}

#[tokio::test]
async fn test_validation_rejects_empty_and_blank_fields() {
    let h = harness();
    h.auth.grant_user("shopper");

    let (status, _) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/orders",
            Some("shopper"),
            &json!({
                "items": [],
                "totalAmount": "0.00",
                "shippingAddress": "123 Main St",
                "paymentMethod": "card"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let product = seed_product(&h, "Validated", 1000, 5);
    let (status, _) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/orders",
            Some("shopper"),
            &json!({
                "items": [{ "product_id": product.id.0, "quantity": 1 }],
                "totalAmount": "10.00",
                "shippingAddress": "   ",
                "paymentMethod": "card"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_idempotency_key_replays_with_200() {
    let h = harness();
    h.auth.grant_user("shopper");
    let product = seed_product(&h, "Replayed Coat", 2500, 5);

    let order = json!({
        "items": [{ "product_id": product.id.0, "quantity": 2 }],
        "totalAmount": "50.00",
        "shippingAddress": "123 Main St",
        "paymentMethod": "paypal",
        "idempotencyKey": "retry-token-1"
    });

    let (status, first) = send(
        &h.app,
        with_json("POST", "/api/v1/orders", Some("shopper"), &order),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) = send(
        &h.app,
        with_json("POST", "/api/v1/orders", Some("shopper"), &order),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["orderId"], second["orderId"]);

    // One order, one decrement
    assert_eq!(h.ledger.order_count(), 1);
    assert_eq!(h.catalog.stock_of(product.id), Some(3));
}

#[tokio::test]
async fn test_buy_now_keeps_unrelated_cart_lines() {
    let h = harness();
    let identity = h.auth.grant_user("shopper");
    let in_cart = seed_product(&h, "Kept Socks", 500, 5);
    let bought_directly = seed_product(&h, "Bought Hat", 1500, 5);

    send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/cart",
            Some("shopper"),
            &json!({ "productId": in_cart.id.0, "quantity": 1 }),
        ),
    )
    .await;

    // "Buy now" bypasses the cart entirely
    let (status, _) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/orders",
            Some("shopper"),
            &json!({
                "items": [{ "product_id": bought_directly.id.0, "quantity": 1 }],
                "totalAmount": "15.00",
                "shippingAddress": "123 Main St",
                "paymentMethod": "card"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The cart line survives
    assert_eq!(h.cart.quantity_of(identity.user_id, in_cart.id), Some(1));
}

#[tokio::test]
async fn test_admin_routes_demand_admin_role() {
    let h = harness();
    h.auth.grant_user("customer");
    h.auth.grant_admin("boss");

    let (status, _) = send(
        &h.app,
        get("/api/v1/admin/dashboard/stats", Some("customer")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&h.app, get("/api/v1/admin/dashboard/stats", Some("boss"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_status_update_validates_enumeration() {
    let h = harness();
    h.auth.grant_user("shopper");
    h.auth.grant_admin("boss");
    let product = seed_product(&h, "Status Bag", 1000, 5);

    let (_, placed) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/orders",
            Some("shopper"),
            &json!({
                "items": [{ "product_id": product.id.0, "quantity": 1 }],
                "totalAmount": "10.00",
                "shippingAddress": "123 Main St",
                "paymentMethod": "card"
            }),
        ),
    )
    .await;
    let order_id = placed["orderId"].as_str().expect("order id").to_string();

    let (status, _) = send(
        &h.app,
        with_json(
            "PUT",
            &format!("/api/v1/admin/orders/{order_id}/status"),
            Some("boss"),
            &json!({ "status": "refunded" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &h.app,
        with_json(
            "PUT",
            &format!("/api/v1/admin/orders/{order_id}/status"),
            Some("boss"),
            &json!({ "status": "shipped" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order status updated successfully");
}

#[tokio::test]
async fn test_category_delete_guard_surfaces_conflict() {
    let h = harness();
    h.auth.grant_admin("boss");

    let (status, created) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/admin/categories",
            Some("boss"),
            &json!({ "name": "Shoes", "description": null, "image": null }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = created["category"]["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/admin/products",
            Some("boss"),
            &json!({
                "name": "Runner",
                "description": null,
                "price": "59.99",
                "original_price": null,
                "category_id": category_id,
                "size": null,
                "color": null,
                "brand": null,
                "image": null,
                "stock_quantity": 10,
                "is_featured": false
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &h.app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/admin/categories/{category_id}"))
            .header(header::AUTHORIZATION, "Bearer boss")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_injected_commit_failure_is_a_500_with_no_side_effects() {
    let h = harness();
    let identity = h.auth.grant_user("shopper");
    let product = seed_product(&h, "Fragile Vase", 1000, 5);

    send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/cart",
            Some("shopper"),
            &json!({ "productId": product.id.0, "quantity": 1 }),
        ),
    )
    .await;

    h.ledger.fail_next_commit();
    let (status, body) = send(
        &h.app,
        with_json(
            "POST",
            "/api/v1/orders",
            Some("shopper"),
            &json!({
                "items": [{ "product_id": product.id.0, "quantity": 1 }],
                "totalAmount": "10.00",
                "shippingAddress": "123 Main St",
                "paymentMethod": "card"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");

    // Atomicity: no order, stock intact, cart intact
    assert_eq!(h.ledger.order_count(), 0);
    assert_eq!(h.catalog.stock_of(product.id), Some(5));
    assert_eq!(h.cart.quantity_of(identity.user_id, product.id), Some(1));
}
