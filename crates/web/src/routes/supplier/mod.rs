//! Supplier dashboard panels.
//!
//! The supplier back-office is the scoped subset of the admin one:
//! categories, the supplier's own products, and a read-only orders view.
//! Product scoping is enforced client-side after the fetch - the backend
//! has been observed to return other suppliers' records even when asked
//! for one user's - so the filter here is the only thing the supplier
//! sees through, and the backend must enforce the real boundary itself.

pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the supplier dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/profile", get(profile::show))
        .route("/categories", get(categories::index).post(categories::create))
        .route("/categories/{id}", post(categories::update))
        .route(
            "/categories/{id}/delete",
            get(categories::confirm_delete).post(categories::destroy),
        )
        .route("/products", get(products::index).post(products::create))
        .route("/products/{id}", post(products::update))
        .route(
            "/products/{id}/delete",
            get(products::confirm_delete).post(products::destroy),
        )
        .route("/orders", get(orders::index))
}
