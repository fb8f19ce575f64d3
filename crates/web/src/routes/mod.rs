//! HTTP route handlers for the web frontend.
//!
//! Chrome is decided by path prefix: `/admin` and `/supplier` render the
//! dashboard shell with the role-keyed sidebar, everything else renders
//! the public navbar and footer.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Landing page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (backend reachability)
//!
//! # Marketplace
//! GET  /marketplace             - Catalog listing (in-memory filters)
//! GET  /products/{id}           - Product detail
//! GET  /crops                   - Public crop guide
//!
//! # Cart (requires auth)
//! GET  /cart                    - Cart page; refreshes the session snapshot
//! POST /cart/add                - Add line item
//! POST /cart/remove             - Remove line item
//!
//! # Checkout (requires auth)
//! GET  /checkout                - Address selection + payment selection
//! POST /checkout/address        - Add address
//! POST /checkout/address/{id}          - Update address
//! POST /checkout/address/{id}/delete   - Delete address
//! POST /checkout/address/{id}/select   - Select address
//! POST /checkout/place          - Place order (cod or card)
//!
//! # Orders (requires auth)
//! GET  /orders                  - Order history
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action
//! GET  /register                - Register page
//! POST /register                - Register action
//! POST /logout                  - Logout action
//!
//! # Profile (requires auth)
//! GET  /profile                 - Profile page
//! POST /profile                 - Update name/email
//! POST /profile/password        - Change password
//!
//! # Admin dashboard (requires Admin role)
//! /admin/dashboard, /admin/profile, /admin/users, /admin/categories,
//! /admin/products, /admin/crops, /admin/orders, /admin/notifications
//!
//! # Supplier dashboard (requires Supplier role)
//! /supplier/dashboard, /supplier/profile, /supplier/categories,
//! /supplier/products, /supplier/orders
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod crops;
pub mod home;
pub mod marketplace;
pub mod orders;
pub mod profile;
pub mod supplier;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/address", post(checkout::add_address))
        .route("/address/{id}", post(checkout::update_address))
        .route("/address/{id}/delete", post(checkout::delete_address))
        .route("/address/{id}/select", post(checkout::select_address))
        .route("/place", post(checkout::place))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show).post(profile::update))
        .route("/password", post(profile::change_password))
}

/// Create all routes for the web frontend.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Public pages
        .route("/", get(home::home))
        .route("/marketplace", get(marketplace::index))
        .route("/products/{id}", get(marketplace::show))
        .route("/crops", get(crops::index))
        // Customer flows
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/orders", get(orders::index))
        .nest("/profile", profile_routes())
        // Auth
        .merge(auth_routes())
        // Dashboards
        .nest("/admin", admin::routes())
        .nest("/supplier", supplier::routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies backend reachability before returning OK.
/// Returns 503 Service Unavailable if the backend is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.agrigen().ping().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
