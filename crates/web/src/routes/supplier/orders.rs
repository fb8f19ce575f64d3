//! Supplier orders view.
//!
//! Read-only: the order records carry no product linkage, so there is
//! nothing client-side to scope them by and nothing for a supplier to
//! safely mutate. Status changes stay with the admin panel.

use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireSupplier;
use crate::routes::admin::orders::OrderRow;
use crate::routes::admin::{Dash, PanelQuery};
use crate::routes::orders::ParsedShippingAddress;
use crate::state::AppState;

const PANEL_PATH: &str = "/supplier/orders";

/// Supplier orders template.
#[derive(Template, WebTemplate)]
#[template(path = "supplier/orders.html")]
pub struct SupplierOrdersTemplate {
    pub dash: Dash,
    pub rows: Vec<OrderRow>,
    pub page: Page,
}

/// Display the orders view.
#[instrument(skip(supplier, state))]
pub async fn index(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<SupplierOrdersTemplate> {
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

    Ok(SupplierOrdersTemplate {
        dash: Dash::new(supplier, PANEL_PATH),
        rows,
        page,
    })
}
