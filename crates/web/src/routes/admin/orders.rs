//! Order management panel.
//!
//! Orders are server-owned; this panel reads them, flips their status
//! fields through the dropdowns, and deletes them. There is no create.

use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use agrizen_core::{OrderId, OrderStatus, PaymentStatus};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::agrigen::types::OrderStatusUpdate;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::orders::ParsedShippingAddress;
use crate::state::AppState;

use super::{ConfirmDeleteTemplate, Dash, PanelQuery};

const PANEL_PATH: &str = "/admin/orders";

/// Table row.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub order_id: i32,
    pub user_id: i32,
    pub total_amount: Decimal,
    pub order_status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub address_line: String,
    pub created_at: String,
}

/// Orders panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersPanelTemplate {
    pub dash: Dash,
    pub rows: Vec<OrderRow>,
    pub page: Page,
    pub order_statuses: Vec<&'static str>,
    pub payment_statuses: Vec<&'static str>,
}

async fn render(
    state: &AppState,
    dash: Dash,
    query: &PanelQuery,
) -> Result<OrdersPanelTemplate> {
    let orders = state.agrigen().all_orders().await?;

    let page = Page::resolve(orders.len(), PANEL_PAGE_SIZE, query.page());
    let rows = page
        .window(&orders)
        .iter()
        .map(|o| OrderRow {
            order_id: o.order_id.as_i32(),
            user_id: o.user_id.as_i32(),
            total_amount: o.total_amount,
            order_status: o.order_status.clone(),
            payment_status: o.payment_status.clone(),
            payment_method: o.payment_method.clone(),
            address_line: ParsedShippingAddress::parse(&o.shipping_address).display_line(),
            created_at: o.created_at.clone(),
        })
        .collect();

    Ok(OrdersPanelTemplate {
        dash,
        rows,
        page,
        order_statuses: OrderStatus::ALL.iter().map(|s| s.as_str()).collect(),
        payment_statuses: PaymentStatus::ALL.iter().map(|s| s.as_str()).collect(),
    })
}

/// Display the orders panel.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<OrdersPanelTemplate> {
    render(&state, Dash::new(admin, PANEL_PATH), &query).await
}

/// Status dropdown form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub order_status: String,
    pub payment_status: String,
}

/// Update the status fields of an order.
#[instrument(skip(_admin, state, form))]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    // Only recognized dropdown values travel to the backend.
    let order_status = form
        .order_status
        .parse::<OrderStatus>()
        .map_err(AppError::BadRequest)?;
    let payment_status = form
        .payment_status
        .parse::<PaymentStatus>()
        .map_err(AppError::BadRequest)?;

    let update = OrderStatusUpdate {
        order_id: OrderId::new(id),
        order_status: Some(order_status.as_str().to_string()),
        payment_status: Some(payment_status.as_str().to_string()),
    };
    state.agrigen().update_order_status(&update).await?;

    Ok(Redirect::to(PANEL_PATH))
}

/// Confirmation page before deleting an order.
#[instrument(skip(admin))]
pub async fn confirm_delete(
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> ConfirmDeleteTemplate {
    ConfirmDeleteTemplate {
        dash: Dash::new(admin, PANEL_PATH),
        resource: "order",
        label: format!("Order #{id}"),
        action: format!("{PANEL_PATH}/{id}/delete"),
        cancel: PANEL_PATH,
    }
}

/// Delete an order.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    state.agrigen().delete_order(OrderId::new(id)).await?;
    Ok(Redirect::to(PANEL_PATH))
}
