//! Cart route handlers.
//!
//! Every cart fetch refreshes the session's cart snapshot, which feeds
//! the navbar badge and the checkout page. Mutations re-fetch rather than
//! patch the cached copy.

use agrizen_core::{CartItemId, ProductId};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::agrigen::types::NewCartItem;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::cart::CartSnapshot;
use crate::models::nav::Nav;
use crate::models::session_keys;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub cart_id: i32,
    pub name: String,
    pub image_url: String,
    pub price: Decimal,
    pub quantity: u32,
    pub total: Decimal,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub nav: Nav,
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart snapshot out of the session, treating malformed values
/// as an empty cart.
pub async fn get_snapshot(session: &Session) -> CartSnapshot {
    session
        .get::<CartSnapshot>(session_keys::CART_SNAPSHOT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Mirror a fresh fetch into the session.
pub async fn set_snapshot(
    session: &Session,
    snapshot: &CartSnapshot,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CART_SNAPSHOT, snapshot)
        .await
}

/// Drop the cached snapshot (after a successful order).
pub async fn clear_snapshot(
    session: &Session,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session
        .remove::<CartSnapshot>(session_keys::CART_SNAPSHOT)
        .await?;
    Ok(())
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
    pub price: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub cart_id: i32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
///
/// Fetches the user's cart, mirrors it into the session, and renders it.
/// A failed fetch renders the empty state without touching the cached
/// snapshot.
#[instrument(skip(state, session))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<CartTemplate> {
    let snapshot = match state.agrigen().cart_items(user.id).await {
        Ok(items) => {
            let snapshot = CartSnapshot::from_items(items);
            set_snapshot(&session, &snapshot).await?;
            snapshot
        }
        Err(e) => {
            tracing::warn!("Failed to fetch cart for {}: {e}", user.id);
            CartSnapshot::default()
        }
    };

    let items = snapshot
        .items
        .iter()
        .map(|item| CartItemView {
            cart_id: item.cart_id.as_i32(),
            name: item.name.clone(),
            image_url: state.agrigen().upload_url("products", &item.image),
            price: item.price,
            quantity: item.quantity,
            total: item.total,
        })
        .collect();
    let subtotal = snapshot.subtotal();

    Ok(CartTemplate {
        nav: Nav::load(&session).await,
        items,
        subtotal,
    })
}

/// Add an item to the cart, then return to the product page's cart.
///
/// The create request carries no idempotency key, so resubmitting the
/// form creates a second line item for the same product.
#[instrument(skip(state, session, form))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let price: Decimal = form
        .price
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("invalid price".to_string()))?;

    let item = NewCartItem {
        user_id: user.id,
        product_id: ProductId::new(form.product_id),
        quantity: form.quantity.unwrap_or(1).max(1),
        price,
    };

    state.agrigen().add_cart_item(&item).await?;
    refresh_snapshot(&state, &session, user.id).await;

    Ok(Redirect::to("/cart").into_response())
}

/// Remove an item from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    state
        .agrigen()
        .remove_cart_item(CartItemId::new(form.cart_id))
        .await?;
    refresh_snapshot(&state, &session, user.id).await;

    Ok(Redirect::to("/cart").into_response())
}

/// Best-effort re-fetch after a mutation; the next page load repairs the
/// snapshot if this one fails.
async fn refresh_snapshot(state: &AppState, session: &Session, user_id: agrizen_core::UserId) {
    match state.agrigen().cart_items(user_id).await {
        Ok(items) => {
            let snapshot = CartSnapshot::from_items(items);
            if let Err(e) = set_snapshot(session, &snapshot).await {
                tracing::error!("Failed to store cart snapshot: {e}");
            }
        }
        Err(e) => tracing::warn!("Failed to refresh cart after mutation: {e}"),
    }
}
