/// Integration tests for the Stockroom API
///
/// These tests drive the full router end-to-end against a real database:
/// - Signup/login flow and token issuance
/// - Bearer-token gate on protected routes
/// - Add-or-merge-by-SKU semantics, including the name-binding conflict
/// - Paginated listing
/// - Quantity overwrite
/// - Analytics lookups
///
/// Requires PostgreSQL via DATABASE_URL (see tests/common/mod.rs).

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{get_request, json_request, response_json, TestContext};
use serde_json::json;
use stockroom_shared::auth::jwt::{create_token, Claims};
use stockroom_shared::models::product::Product;
use stockroom_shared::models::user::User;
use tower::Service as _;

/// Posts a product through the API and returns (status, body)
async fn post_product(
    ctx: &TestContext,
    sku: &str,
    name: &str,
    quantity: i64,
    price: f64,
) -> (StatusCode, serde_json::Value) {
    let request = json_request(
        "POST",
        "/products",
        Some(&ctx.auth_header()),
        &json!({
            "name": name,
            "type": "hardware",
            "sku": sku,
            "description": "integration test product",
            "quantity": quantity,
            "price": price
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    response_json(response).await
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .clone()
        .call(get_request("/health", None))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_signup_and_login_flow() {
    let ctx = TestContext::new().await.unwrap();

    // Signup
    let request = json_request(
        "POST",
        "/signup",
        None,
        &json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "hunter42"
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"]["userID"].is_i64());
    // The hash must never leave the server
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // The stored credential is a salted hash, never the plaintext
    let stored = User::find_by_username(&ctx.db, "alice")
        .await
        .unwrap()
        .expect("user was created");
    assert_ne!(stored.password_hash, "hunter42");
    assert!(stored.password_hash.starts_with("$argon2id$"));

    // Login
    let request = json_request(
        "POST",
        "/login",
        None,
        &json!({ "username": "alice", "password": "hunter42" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    let token = body["token"].as_str().expect("token issued").to_string();

    // The issued token opens protected routes
    let response = ctx
        .app
        .clone()
        .call(get_request("/analytics", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The same token with one altered byte does not
    let mut tampered = token.clone().into_bytes();
    let mid = tampered.len() / 2;
    tampered[mid] = if tampered[mid] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = ctx
        .app
        .clone()
        .call(get_request(
            "/analytics",
            Some(&format!("Bearer {}", tampered)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validation() {
    let ctx = TestContext::new().await.unwrap();

    // Missing password
    let request = json_request(
        "POST",
        "/signup",
        None,
        &json!({ "username": "bob", "email": "bob@example.com" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    // Password too short
    let request = json_request(
        "POST",
        "/signup",
        None,
        &json!({ "username": "bob", "email": "bob@example.com", "password": "short" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("at least 6 characters"));

    // Missing username
    let request = json_request(
        "POST",
        "/signup",
        None,
        &json!({ "email": "bob@example.com", "password": "hunter42" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, _) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_conflicts() {
    let ctx = TestContext::new().await.unwrap();

    let request = json_request(
        "POST",
        "/signup",
        None,
        &json!({ "username": "carol", "email": "carol@example.com", "password": "hunter42" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same username, different email
    let request = json_request(
        "POST",
        "/signup",
        None,
        &json!({ "username": "carol", "email": "other@example.com", "password": "hunter42" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");

    // Same email, different username
    let request = json_request(
        "POST",
        "/signup",
        None,
        &json!({ "username": "dave", "email": "carol@example.com", "password": "hunter42" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_login_failures() {
    let ctx = TestContext::new().await.unwrap();

    let request = json_request(
        "POST",
        "/signup",
        None,
        &json!({ "username": "erin", "email": "erin@example.com", "password": "hunter42" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Unknown user
    let request = json_request(
        "POST",
        "/login",
        None,
        &json!({ "username": "nobody", "password": "hunter42" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No such user exists. Please signup");

    // Wrong password
    let request = json_request(
        "POST",
        "/login",
        None,
        &json!({ "username": "erin", "password": "wrong-password" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect password");

    // Missing fields
    let request = json_request("POST", "/login", None, &json!({ "username": "erin" }));
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, _) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await.unwrap();

    // No header
    let response = ctx
        .app
        .clone()
        .call(get_request("/products", None))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");

    // Wrong scheme
    let response = ctx
        .app
        .clone()
        .call(get_request("/products", Some("Basic dXNlcjpwYXNz")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let response = ctx
        .app
        .clone()
        .call(get_request("/products", Some("Bearer not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Expired token (well past the validation leeway)
    let expired_claims =
        Claims::with_expiration(ctx.user.id, &ctx.user.username, Duration::hours(-2));
    let expired = create_token(&expired_claims, &ctx.config.jwt.secret).unwrap();
    let response = ctx
        .app
        .clone()
        .call(get_request(
            "/products",
            Some(&format!("Bearer {}", expired)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A valid token passes
    let response = ctx
        .app
        .clone()
        .call(get_request("/products", Some(&ctx.auth_header())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_add_product_merges_quantity_by_sku() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = post_product(&ctx, "WID-001", "Widget", 5, 12.5).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product added successfully");
    let first_id = body["product"]["id"].as_i64().unwrap();

    // Same SKU, same name: quantities accumulate, same row
    let (status, body) = post_product(&ctx, "WID-001", "Widget", 3, 12.5).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product quantity updated successfully");
    assert_eq!(body["product"]["id"].as_i64().unwrap(), first_id);

    let stored = Product::find_by_sku(&ctx.db, "WID-001")
        .await
        .unwrap()
        .expect("product exists");
    assert_eq!(stored.quantity, 8);
    assert_eq!(stored.id as i64, first_id);
}

#[tokio::test]
async fn test_add_product_rejects_different_name_for_sku() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = post_product(&ctx, "GAD-007", "Gadget", 2, 30.0).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same SKU, different name: the SKU is bound to its first name
    let (status, body) = post_product(&ctx, "GAD-007", "Gizmo", 9, 30.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("GAD-007"));
    assert!(message.contains("Gadget"));

    // The stored row is untouched
    let stored = Product::find_by_sku(&ctx.db, "GAD-007")
        .await
        .unwrap()
        .expect("product exists");
    assert_eq!(stored.product_name, "Gadget");
    assert_eq!(stored.quantity, 2);
}

#[tokio::test]
async fn test_add_product_validation_precedes_store_access() {
    let ctx = TestContext::new().await.unwrap();

    // Missing name
    let request = json_request(
        "POST",
        "/products",
        Some(&ctx.auth_header()),
        &json!({
            "type": "hardware",
            "sku": "NO-NAME",
            "description": "d",
            "quantity": 1,
            "price": 1.0
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product name is required");

    // Negative quantity
    let (status, body) = post_product(&ctx, "NEG-QTY", "Thing", -1, 1.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("non-negative integer"));

    // Negative price
    let (status, body) = post_product(&ctx, "NEG-PRC", "Thing", 1, -1.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("non-negative number"));

    // Missing quantity
    let request = json_request(
        "POST",
        "/products",
        Some(&ctx.auth_header()),
        &json!({
            "name": "Thing",
            "type": "hardware",
            "sku": "NO-QTY",
            "description": "d",
            "price": 1.0
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product quantity is required");

    // None of the rejected requests reached the store
    assert_eq!(Product::count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_product_listing_pagination() {
    let ctx = TestContext::new().await.unwrap();

    for i in 1..=25 {
        let (status, _) = post_product(&ctx, &format!("PAG-{:03}", i), "Paged", 1, 2.0).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Page 1: full page, newest id first
    let response = ctx
        .app
        .clone()
        .call(get_request("/products?page=1", Some(&ctx.auth_header())))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["totalProducts"], 25);
    assert_eq!(body["pagination"]["itemsPerPage"], 10);
    assert_eq!(body["pagination"]["hasNextPage"], true);
    assert_eq!(body["pagination"]["hasPreviousPage"], false);
    assert_eq!(body["products"][0]["sku"], "PAG-025");

    // Page 3: the 5 remaining rows
    let response = ctx
        .app
        .clone()
        .call(get_request("/products?page=3", Some(&ctx.auth_header())))
        .await
        .unwrap();
    let (_, body) = response_json(response).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPreviousPage"], true);

    // Page below 1 clamps to 1
    let response = ctx
        .app
        .clone()
        .call(get_request("/products?page=0", Some(&ctx.auth_header())))
        .await
        .unwrap();
    let (_, body) = response_json(response).await;
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["products"].as_array().unwrap().len(), 10);

    // Page past the end is an empty set, not an error
    let response = ctx
        .app
        .clone()
        .call(get_request("/products?page=99", Some(&ctx.auth_header())))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["hasNextPage"], false);

    // Default page is 1
    let response = ctx
        .app
        .clone()
        .call(get_request("/products", Some(&ctx.auth_header())))
        .await
        .unwrap();
    let (_, body) = response_json(response).await;
    assert_eq!(body["pagination"]["currentPage"], 1);
}

#[tokio::test]
async fn test_update_quantity_replaces_stored_value() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = post_product(&ctx, "QTY-001", "Counter", 5, 3.0).await;
    let id = body["product"]["id"].as_i64().unwrap();

    // Overwrites, does not add
    let request = json_request(
        "PUT",
        &format!("/products/{}/quantity", id),
        Some(&ctx.auth_header()),
        &json!({ "quantity": 17 }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["productId"].as_i64().unwrap(), id);
    assert_eq!(body["quantity"], 17);

    let stored = Product::find_by_sku(&ctx.db, "QTY-001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.quantity, 17);

    // Negative quantity rejected
    let request = json_request(
        "PUT",
        &format!("/products/{}/quantity", id),
        Some(&ctx.auth_header()),
        &json!({ "quantity": -4 }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing quantity rejected
    let request = json_request(
        "PUT",
        &format!("/products/{}/quantity", id),
        Some(&ctx.auth_header()),
        &json!({}),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown product: 404, and nothing was mutated
    let request = json_request(
        "PUT",
        "/products/999999/quantity",
        Some(&ctx.auth_header()),
        &json!({ "quantity": 1 }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let stored = Product::find_by_sku(&ctx.db, "QTY-001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.quantity, 17);
}

#[tokio::test]
async fn test_analytics() {
    let ctx = TestContext::new().await.unwrap();

    // Empty catalog: both lookups are null
    let response = ctx
        .app
        .clone()
        .call(get_request("/analytics", Some(&ctx.auth_header())))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["mostStockedProduct"].is_null());
    assert!(body["mostExpensiveProduct"].is_null());

    post_product(&ctx, "BULK-1", "Bulk Item", 50, 5.0).await;
    post_product(&ctx, "LUX-1", "Luxury Item", 2, 99.5).await;
    post_product(&ctx, "MID-1", "Middle Item", 10, 20.0).await;

    let response = ctx
        .app
        .clone()
        .call(get_request("/analytics", Some(&ctx.auth_header())))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mostStockedProduct"]["sku"], "BULK-1");
    assert_eq!(body["mostStockedProduct"]["quantity"], 50);
    assert_eq!(body["mostExpensiveProduct"]["sku"], "LUX-1");
    assert_eq!(body["mostExpensiveProduct"]["productName"], "Luxury Item");
}
