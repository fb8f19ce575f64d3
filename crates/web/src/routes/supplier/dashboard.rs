//! Supplier dashboard overview.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::middleware::RequireSupplier;
use crate::routes::admin::Dash;
use crate::routes::supplier::products::scoped_products;
use crate::state::AppState;

/// Supplier dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "supplier/dashboard.html")]
pub struct SupplierDashboardTemplate {
    pub dash: Dash,
    pub product_count: usize,
    pub active_count: usize,
}

/// Display the supplier overview: counts over the supplier's own
/// products plus quick links into the panels.
#[instrument(skip(supplier, state))]
pub async fn show(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
) -> SupplierDashboardTemplate {
    let owner = supplier.id;
    let products = match state.agrigen().products(Some(owner)).await {
        Ok(products) => scoped_products(products, owner),
        Err(e) => {
            tracing::warn!("Failed to fetch supplier products: {e}");
            Vec::new()
        }
    };

    let active_count = products
        .iter()
        .filter(|p| p.status.eq_ignore_ascii_case("active"))
        .count();

    SupplierDashboardTemplate {
        dash: Dash::new(supplier, "/supplier/dashboard"),
        product_count: products.len(),
        active_count,
    }
}
