//! HTTP middleware stack for the web frontend.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors; added by the binary)
//! 2. `TraceLayer` (request tracing; added by the binary)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Request ID (add unique ID to each request)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    GuardRejection, OptionalAuth, RequireAdmin, RequireAuth, RequireSupplier, check_role,
    clear_current_user, set_current_user,
};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
