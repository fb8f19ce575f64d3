//! Checkout: address selection, payment selection, order submission.
//!
//! The address book lives only in the session. Both payment paths build
//! the same order payload; the card path tokenizes the card details first
//! and attaches the token. A successful order clears the cart snapshot; a
//! failure re-renders the page with a blocking error banner and leaves
//! all state untouched.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use agrizen_core::PaymentMethod;

use crate::agrigen::types::OrderPayload;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::models::address::{AddressBook, AddressFields};
use crate::models::nav::Nav;
use crate::models::session_keys;
use crate::routes::cart::{clear_snapshot, get_snapshot};
use crate::services::payments::{CardDetails, PaymentError};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the address book out of the session.
pub async fn get_address_book(session: &Session) -> AddressBook {
    session
        .get::<AddressBook>(session_keys::ADDRESSES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the address book.
pub async fn set_address_book(
    session: &Session,
    book: &AddressBook,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ADDRESSES, book).await
}

// =============================================================================
// Views
// =============================================================================

/// Address display data.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub selected: bool,
}

/// Cart line summary shown next to the payment choices.
#[derive(Debug, Clone)]
pub struct LineView {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub total: Decimal,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nav: Nav,
    pub addresses: Vec<AddressView>,
    pub lines: Vec<LineView>,
    pub total: Decimal,
    pub card_enabled: bool,
    pub error: Option<String>,
}

async fn render(
    state: &AppState,
    session: &Session,
    error: Option<String>,
) -> Result<CheckoutTemplate> {
    let book = get_address_book(session).await;
    let snapshot = get_snapshot(session).await;

    let addresses = book
        .addresses()
        .iter()
        .map(|a| AddressView {
            id: a.id.to_string(),
            full_name: a.full_name.clone(),
            phone: a.phone.clone(),
            street: a.street.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            zip: a.zip.clone(),
            selected: book.is_selected(a.id),
        })
        .collect();

    let lines = snapshot
        .items
        .iter()
        .map(|item| LineView {
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
            total: item.total,
        })
        .collect();

    Ok(CheckoutTemplate {
        nav: Nav::load(session).await,
        addresses,
        lines,
        total: snapshot.subtotal(),
        card_enabled: state.payments().is_some(),
        error,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page, or bounce back to the cart when it is empty.
#[instrument(skip(state, session))]
pub async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let snapshot = get_snapshot(&session).await;
    if snapshot.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }
    Ok(render(&state, &session, None).await?.into_response())
}

/// Add an address to the book.
#[instrument(skip(state, session, form))]
pub async fn add_address(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddressFields>,
) -> Result<Response> {
    if let Err(e) = form.validate() {
        return Ok(render(&state, &session, Some(e.to_string()))
            .await?
            .into_response());
    }

    let mut book = get_address_book(&session).await;
    book.add(form);
    set_address_book(&session, &book).await?;

    Ok(Redirect::to("/checkout").into_response())
}

/// Overwrite an existing address.
#[instrument(skip(state, session, form))]
pub async fn update_address(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Form(form): Form<AddressFields>,
) -> Result<Response> {
    if let Err(e) = form.validate() {
        return Ok(render(&state, &session, Some(e.to_string()))
            .await?
            .into_response());
    }

    let mut book = get_address_book(&session).await;
    if !book.update(id, form) {
        return Err(AppError::NotFound(format!("address {id}")));
    }
    set_address_book(&session, &book).await?;

    Ok(Redirect::to("/checkout").into_response())
}

/// Delete an address. Selection falls back per the address book rules.
#[instrument(skip(session))]
pub async fn delete_address(
    RequireAuth(_user): RequireAuth,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Redirect> {
    let mut book = get_address_book(&session).await;
    book.remove(id);
    set_address_book(&session, &book).await?;
    Ok(Redirect::to("/checkout"))
}

/// Select an address for the order.
#[instrument(skip(session))]
pub async fn select_address(
    RequireAuth(_user): RequireAuth,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Redirect> {
    let mut book = get_address_book(&session).await;
    book.select(id);
    set_address_book(&session, &book).await?;
    Ok(Redirect::to("/checkout"))
}

/// Place order form data.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    pub payment_method: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub exp_month: String,
    #[serde(default)]
    pub exp_year: String,
    #[serde(default)]
    pub cvc: String,
}

/// Submit the order.
#[instrument(skip(state, session, form))]
pub async fn place(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Response> {
    let snapshot = get_snapshot(&session).await;
    if snapshot.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let book = get_address_book(&session).await;
    let Some(address) = book.selected() else {
        return Ok(render(
            &state,
            &session,
            Some("Please select a shipping address.".to_string()),
        )
        .await?
        .into_response());
    };

    let method: PaymentMethod = match form.payment_method.parse() {
        Ok(method) => method,
        Err(_) => {
            return Err(AppError::BadRequest("unknown payment method".to_string()));
        }
    };

    let stripe_token = match method {
        PaymentMethod::Cod => None,
        PaymentMethod::Stripe => match tokenize_card(&state, &form).await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("Card tokenization failed: {e}");
                return Ok(render(&state, &session, Some(e.to_string()))
                    .await?
                    .into_response());
            }
        },
    };

    let payload = OrderPayload {
        user_id: user.id,
        total_amount: snapshot.subtotal(),
        shipping_address: address.clone(),
        payment_method: method,
        stripe_token,
        cart_items: snapshot.items.clone(),
    };

    match state.agrigen().place_order(&payload).await {
        Ok(()) => {
            clear_snapshot(&session).await?;
            audit_order(&user, &payload);
            Ok(Redirect::to("/orders").into_response())
        }
        Err(e) => {
            // The page stays in its pre-action state; nothing was cleared.
            tracing::warn!("Order submission failed for {}: {e}", user.id);
            Ok(render(&state, &session, Some(format!("Order failed: {e}")))
                .await?
                .into_response())
        }
    }
}

async fn tokenize_card(state: &AppState, form: &PlaceOrderForm) -> std::result::Result<String, PaymentError> {
    let payments = state.payments().ok_or(PaymentError::NotConfigured)?;
    let card = CardDetails {
        number: form.card_number.clone(),
        exp_month: form.exp_month.clone(),
        exp_year: form.exp_year.clone(),
        cvc: form.cvc.clone(),
    };
    payments.tokenize(&card).await
}

fn audit_order(user: &CurrentUser, payload: &OrderPayload) {
    tracing::info!(
        user_id = %user.id,
        total = %payload.total_amount,
        method = %payload.payment_method,
        lines = payload.cart_items.len(),
        "Order placed"
    );
}
