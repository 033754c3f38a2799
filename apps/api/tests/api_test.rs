//! End-to-end tests: the full router over an in-memory database.

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stockmaster_api::config::AppConfig;
use stockmaster_api::{router, AppState};
use stockmaster_db::{Database, DbConfig};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db.clone(), AppConfig::default());

        TestApp {
            app: router(state),
            db,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Registers a user and returns the bearer token.
    async fn register(&self, email: &str, role: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "name": "Test User",
                    "email": email,
                    "password": "password123",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn manager(&self) -> String {
        self.register("manager@stockmaster.test", "Inventory Manager").await
    }

    async fn create_product(&self, token: &str, sku: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/products",
            Some(token),
            Some(json!({ "name": "Office Chair", "sku": sku, "category": "Furniture" })),
        )
        .await
    }
}

fn error_messages(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["message"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Public Surface
// =============================================================================

#[tokio::test]
async fn test_health() {
    let t = TestApp::new().await;

    let (status, body) = t.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "StockMaster API is running");
}

#[tokio::test]
async fn test_unknown_route() {
    let t = TestApp::new().await;

    let (status, body) = t.send(Method::GET, "/api/nothing-here", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_protected_routes_need_token() {
    let t = TestApp::new().await;

    let (status, _) = t.send(Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t
        .send(Method::GET, "/api/dashboard/stats", Some("not.a.token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_register_login_me() {
    let t = TestApp::new().await;
    t.manager().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "manager@stockmaster.test", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "manager@stockmaster.test", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "Inventory Manager");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap().to_string();
    let (status, body) = t.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "manager@stockmaster.test");
}

#[tokio::test]
async fn test_register_validation() {
    let t = TestApp::new().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "", "email": "not-an-email", "password": "123" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let messages = error_messages(&body);
    assert!(messages.contains(&"Name is required".to_string()));
    assert!(messages.contains(&"Valid email is required".to_string()));
    assert!(messages.contains(&"Password must be at least 6 characters".to_string()));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let t = TestApp::new().await;

    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/login")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_otp_for_unknown_email() {
    let t = TestApp::new().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/request-otp",
            None,
            Some(json!({ "email": "nobody@stockmaster.test" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Email not found");
    let codes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM otps")
        .fetch_one(t.db.pool())
        .await
        .unwrap();
    assert_eq!(codes, 0);
}

#[tokio::test]
async fn test_otp_is_single_use() {
    let t = TestApp::new().await;
    t.manager().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/request-otp",
            None,
            Some(json!({ "email": "manager@stockmaster.test" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let otp = body["otp"].as_str().unwrap().to_string();
    assert_eq!(otp.len(), 6);

    let verify = json!({ "email": "manager@stockmaster.test", "otp": otp });
    let (status, _) = t
        .send(Method::POST, "/api/auth/verify-otp", None, Some(verify.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t
        .send(Method::POST, "/api/auth/verify-otp", None, Some(verify))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired OTP");
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_duplicate_sku_rejected() {
    let t = TestApp::new().await;
    let token = t.manager().await;

    let (status, body) = t.create_product(&token, "X-1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["product"]["unit_of_measure"], "Unit");
    assert_eq!(body["product"]["status"], "Out of Stock");

    let (status, body) = t.create_product(&token, "X-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "SKU already exists");

    let (_, body) = t.send(Method::GET, "/api/products", Some(&token), None).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_to_taken_sku_rejected() {
    let t = TestApp::new().await;
    let token = t.manager().await;
    t.create_product(&token, "X-1").await;
    let (_, body) = t.create_product(&token, "X-2").await;
    let id = body["product"]["id"].as_i64().unwrap();

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(&token),
            Some(json!({ "name": "Office Chair", "sku": "X-1", "category": "Furniture" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "SKU already exists for another product");
}

#[tokio::test]
async fn test_bad_path_and_query_answer_json() {
    let t = TestApp::new().await;
    let token = t.manager().await;

    let (status, body) = t.send(Method::GET, "/api/products/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = t
        .send(Method::GET, "/api/stock?warehouse_id=x", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_product_not_found() {
    let t = TestApp::new().await;
    let token = t.manager().await;

    let (status, body) = t.send(Method::GET, "/api/products/999", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn test_warehouse_writes_need_manager() {
    let t = TestApp::new().await;
    let staff = t.register("staff@stockmaster.test", "Warehouse Staff").await;
    let manager = t.manager().await;
    let warehouse = json!({ "name": "Main Warehouse", "short_code": "WH" });

    let (status, body) = t
        .send(Method::POST, "/api/warehouses", Some(&staff), Some(warehouse.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");

    let (status, _) = t
        .send(Method::POST, "/api/warehouses", Some(&manager), Some(warehouse.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = t
        .send(Method::POST, "/api/warehouses", Some(&manager), Some(warehouse))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Short code already exists");

    // Reads stay open to every role
    let (status, body) = t.send(Method::GET, "/api/warehouses", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["warehouses"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Stock & Operations
// =============================================================================

#[tokio::test]
async fn test_stock_adjustment_logs_delta() {
    let t = TestApp::new().await;
    let token = t.manager().await;

    let (_, product) = t.create_product(&token, "OC-001").await;
    let product_id = product["product"]["id"].as_i64().unwrap();
    let (_, warehouse) = t
        .send(
            Method::POST,
            "/api/warehouses",
            Some(&token),
            Some(json!({ "name": "Main Warehouse", "short_code": "WH" })),
        )
        .await;
    let warehouse_id = warehouse["warehouse"]["id"].as_i64().unwrap();
    let (_, location) = t
        .send(
            Method::POST,
            "/api/locations",
            Some(&token),
            Some(json!({ "name": "Stock Area 1", "short_code": "Stock1", "warehouse_id": warehouse_id })),
        )
        .await;
    let location_id = location["location"]["id"].as_i64().unwrap();

    let (status, body) = t
        .send(
            Method::POST,
            "/api/stock",
            Some(&token),
            Some(json!({
                "product_id": product_id,
                "warehouse_id": warehouse_id,
                "location_id": location_id,
                "on_hand": 10,
                "free_to_use": 8,
                "cost_per_unit": 150.0,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["stock"]["cost_per_unit"], "150.00");
    let stock_id = body["stock"]["id"].as_i64().unwrap();

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/stock/{stock_id}"),
            Some(&token),
            Some(json!({ "on_hand": -1, "free_to_use": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_messages(&body).contains(&"On hand must be a non-negative integer".to_string()));

    let (status, _) = t
        .send(
            Method::PUT,
            &format!("/api/stock/{stock_id}"),
            Some(&token),
            Some(json!({ "on_hand": 7, "free_to_use": 7 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = t
        .send(Method::GET, "/api/dashboard/move-history", Some(&token), None)
        .await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["quantity"], -3);
    assert_eq!(history[0]["from_location"], "Manual Adjustment");
}

#[tokio::test]
async fn test_stock_upsert_rules() {
    let t = TestApp::new().await;
    let token = t.manager().await;
    let (_, product) = t.create_product(&token, "OC-001").await;
    let product_id = product["product"]["id"].as_i64().unwrap();

    let (status, body) = t
        .send(
            Method::POST,
            "/api/stock",
            Some(&token),
            Some(json!({
                "product_id": product_id,
                "warehouse_id": 1,
                "on_hand": 10,
                "free_to_use": 8,
                "cost_per_unit": "150.00",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(error_messages(&body), vec!["Valid location ID is required".to_string()]);

    let (status, body) = t
        .send(
            Method::POST,
            "/api/stock",
            Some(&token),
            Some(json!({
                "product_id": product_id,
                "warehouse_id": 1,
                "location_id": 1,
                "on_hand": 100_000_000_000_000_000_i64,
                "free_to_use": 0,
                "cost_per_unit": 150.0,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_messages(&body).contains(&"On hand must be a non-negative integer".to_string()));

    let (status, body) = t
        .send(
            Method::POST,
            "/api/locations",
            Some(&token),
            Some(json!({ "name": "Stock Area 1", "short_code": "Stock1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_messages(&body), vec!["Valid warehouse ID is required".to_string()]);
}

#[tokio::test]
async fn test_receipt_complete_records_history_only() {
    let t = TestApp::new().await;
    let token = t.manager().await;
    let (_, product) = t.create_product(&token, "OC-001").await;
    let product_id = product["product"]["id"].as_i64().unwrap();

    let (status, body) = t
        .send(
            Method::POST,
            "/api/operations",
            Some(&token),
            Some(json!({
                "type": "Receipt",
                "from_location": "Azure Interior",
                "to_location": "WH/Stock1",
                "schedule_date": "2026-03-14",
                "items": [{ "product_id": product_id, "quantity": 5 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["operation"]["reference"], "WH/IN/0001");
    assert_eq!(body["operation"]["status"], "Draft");
    let operation_id = body["operation"]["id"].as_i64().unwrap();

    let (status, body) = t
        .send(
            Method::POST,
            &format!("/api/operations/{operation_id}/complete"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Operation completed successfully");

    let (_, body) = t
        .send(
            Method::GET,
            &format!("/api/dashboard/move-history?product_id={product_id}"),
            Some(&token),
            None,
        )
        .await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["quantity"], 5);
    assert_eq!(history[0]["operation_reference"], "WH/IN/0001");

    let (_, body) = t
        .send(Method::GET, &format!("/api/products/{product_id}"), Some(&token), None)
        .await;
    assert_eq!(body["product"]["total_stock"], 0);

    let (_, body) = t.send(Method::GET, "/api/dashboard/stats", Some(&token), None).await;
    assert_eq!(body["stats"]["totalOperations"], 1);
    assert_eq!(body["stats"]["pendingReceipts"], 0);
}

#[tokio::test]
async fn test_operation_validation() {
    let t = TestApp::new().await;
    let token = t.manager().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/operations",
            Some(&token),
            Some(json!({ "type": "Transfer", "schedule_date": "soon" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let messages = error_messages(&body);
    assert!(messages.contains(&"Invalid operation type".to_string()));
    assert!(messages.contains(&"Valid schedule date is required".to_string()));
}

#[tokio::test]
async fn test_operation_with_unknown_product_writes_nothing() {
    let t = TestApp::new().await;
    let token = t.manager().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/operations",
            Some(&token),
            Some(json!({
                "type": "Delivery",
                "schedule_date": "2026-03-14",
                "items": [{ "product_id": 4242, "quantity": 1 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid reference");

    let (_, body) = t.send(Method::GET, "/api/operations", Some(&token), None).await;
    assert!(body["operations"].as_array().unwrap().is_empty());
}
