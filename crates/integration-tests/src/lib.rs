//! Integration tests for AgriZen.
//!
//! Each test boots the real web application against a stub backend that
//! impersonates the AgriZen PHP controllers, then drives it over HTTP
//! with a cookie-aware client. No external services are involved.
//!
//! # Test Categories
//!
//! - `guards` - Session and role guard redirects
//! - `cart_flow` - Login through cart rendering
//! - `supplier_scope` - Client-side supplier product scoping
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p agrizen-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::Query,
    routing::{get, post},
};
use serde_json::{Value, json};

use agrizen_web::config::WebConfig;
use agrizen_web::state::AppState;

/// Well-known accounts served by the stub login controller.
pub const FARMER_EMAIL: &str = "dhanya@farm.example";
pub const ADMIN_EMAIL: &str = "admin@agrizen.example";
pub const SUPPLIER_EMAIL: &str = "supplier@agrizen.example";
/// Shared password for every stub account.
pub const PASSWORD: &str = "grow-well-2024";

/// A booted application plus the client driving it.
pub struct TestContext {
    /// Cookie-aware client with redirects disabled, so guard redirects
    /// can be asserted directly.
    pub client: reqwest::Client,
    /// Base URL of the running app.
    pub base_url: String,
}

impl TestContext {
    /// Boot the stub backend and the app, both on ephemeral ports.
    ///
    /// # Panics
    ///
    /// Panics when either server fails to bind; tests cannot proceed
    /// without them.
    #[allow(clippy::unwrap_used)]
    pub async fn new() -> Self {
        // Stub backend first: the app needs its address.
        let backend_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let backend_addr = backend_listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(backend_listener, stub_backend()).await.unwrap();
        });

        let app_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let app_addr = app_listener.local_addr().unwrap();

        let config = test_config(app_addr, backend_addr);
        let state = AppState::new(config);
        let app = agrizen_web::app(state);
        tokio::spawn(async move {
            axum::serve(app_listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            client,
            base_url: format!("http://{app_addr}"),
        }
    }

    /// Absolute URL for an app path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Submit the login form; the session cookie lands in the jar.
    ///
    /// # Panics
    ///
    /// Panics if the request itself cannot be sent.
    #[allow(clippy::unwrap_used)]
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .unwrap()
    }
}

fn test_config(app_addr: SocketAddr, backend_addr: SocketAddr) -> WebConfig {
    WebConfig {
        host: app_addr.ip(),
        port: app_addr.port(),
        base_url: format!("http://{app_addr}"),
        api_base_url: format!("http://{backend_addr}"),
        stripe_secret_key: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

// =============================================================================
// Stub backend
// =============================================================================

/// A router that impersonates the AgriZen PHP controllers, envelope
/// quirks included: the login controller answers with a *string* status
/// while the list controllers use numbers, and numeric record fields come
/// back as strings here and there.
pub fn stub_backend() -> Router {
    Router::new()
        .route("/adminController/loginController.php", post(stub_login))
        .route("/adminController/cartController.php", get(stub_cart))
        .route("/adminController/productController.php", get(stub_products))
        .route("/adminController/categoryController.php", get(stub_categories))
        .route(
            "/adminController/marketplaceController.php",
            get(stub_marketplace),
        )
        .route("/adminController/orderController.php", get(stub_orders))
}

async fn stub_login(
    axum::Form(form): axum::Form<HashMap<String, String>>,
) -> Json<Value> {
    let email = form.get("email").map(String::as_str).unwrap_or_default();
    let password = form.get("password").map(String::as_str).unwrap_or_default();

    if password != PASSWORD {
        return Json(json!({"status": 401, "message": "Invalid credentials"}));
    }

    let data = match email {
        FARMER_EMAIL => json!({
            "userid": 7,
            "name": "Dhanya",
            "email": FARMER_EMAIL,
            "role": "Farmer",
        }),
        ADMIN_EMAIL => json!({
            "userid": 1,
            "name": "Asha",
            "email": ADMIN_EMAIL,
            "role": "Admin",
        }),
        SUPPLIER_EMAIL => json!({
            "userid": 12,
            "name": "Ravi",
            "email": SUPPLIER_EMAIL,
            "role": "Supplier",
        }),
        _ => return Json(json!({"status": 401, "message": "Invalid credentials"})),
    };

    // Stringly-typed status, as the real login controller answers.
    Json(json!({"status": "200", "message": "Login successful", "data": data}))
}

async fn stub_cart(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    if query.get("user_id").map(String::as_str) != Some("7") {
        return Json(json!({"status": 200, "data": []}));
    }

    Json(json!({
        "status": 200,
        "data": [
            {
                "cart_id": 11,
                "product_id": "4",
                "name": "Organic Wheat Seed",
                "image": "wheat.jpg",
                "price": "24.99",
                "quantity": "2",
                "total": "49.98"
            },
            {
                "cart_id": 12,
                "product_id": 9,
                "name": "Drip Irrigation Kit",
                "image": "drip.jpg",
                "price": 89.5,
                "quantity": 1,
                "total": 89.5
            }
        ]
    }))
}

async fn stub_products(Query(_query): Query<HashMap<String, String>>) -> Json<Value> {
    // Deliberately ignores the user_id filter: the raw response mixes in
    // another supplier's record so the client-side scope filter is what
    // the test observes.
    Json(json!({
        "status": 200,
        "data": [
            {
                "id": 4, "name": "My Seeds", "description": "",
                "category_id": 1, "price": "24.99", "stock_quantity": 10,
                "unit": "kg", "status": "active", "created_at": "2026-01-10 09:00:00",
                "user_id": 12, "image": "seeds.jpg"
            },
            {
                "id": 5, "name": "Someone Else's Seeds", "description": "",
                "category_id": 1, "price": "19.99", "stock_quantity": 3,
                "unit": "kg", "status": "active", "created_at": "2026-01-11 09:00:00",
                "user_id": 99, "image": "other.jpg"
            },
            {
                "id": 6, "name": "My Fertilizer", "description": "",
                "category_id": 2, "price": "12.00", "stock_quantity": 30,
                "unit": "bag", "status": "inactive", "created_at": "2026-01-12 09:00:00",
                "user_id": 12, "image": "fert.jpg"
            }
        ]
    }))
}

async fn stub_categories() -> Json<Value> {
    Json(json!({
        "status": 200,
        "data": [
            {"id": 1, "name": "Seeds", "description": "", "status": "active"},
            {"id": 2, "name": "Fertilizer", "description": "", "status": "active"}
        ]
    }))
}

async fn stub_marketplace() -> Json<Value> {
    Json(json!({
        "status": 200,
        "data": [
            {
                "id": 4, "name": "Organic Wheat Seed", "description": "Winter wheat",
                "price": "24.99", "category": "Seeds", "unit": "kg", "image": "wheat.jpg"
            }
        ]
    }))
}

async fn stub_orders(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    if query.get("user_id").map(String::as_str) != Some("7") {
        return Json(json!({"status": 200, "data": []}));
    }

    Json(json!({
        "status": 200,
        "data": [
            {
                "order_id": 31,
                "total_amount": "139.48",
                "payment_method": "cod",
                "status": "Pending",
                "created_at": "2026-02-01 14:30:00",
                "shipping_address": "{\"fullName\":\"Dhanya Kumar\",\"city\":\"Thrissur\"}"
            }
        ]
    }))
}
