//! AgriZen Web library.
//!
//! This crate provides the marketplace frontend as a library, allowing it
//! to be booted by the binary and exercised by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod agrigen;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;

use state::AppState;

/// Assemble the application router with its session layer and state.
///
/// The Sentry and tracing layers are added by the binary on top of this,
/// so the integration tests can boot the same app without them.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(session_layer)
        .with_state(state)
}
