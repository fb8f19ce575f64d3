//! Admin dashboard overview.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::Dash;

/// One counter tile.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub title: &'static str,
    pub value: u32,
    pub icon: &'static str,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub dash: Dash,
    pub stats: Vec<StatCard>,
}

/// Display the dashboard counters.
///
/// A failed stats fetch renders zeroes rather than an error page; the
/// dashboard is an overview, not a workflow.
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> DashboardTemplate {
    let stats = match state.agrigen().dashboard_stats().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::warn!("Failed to fetch dashboard stats: {e}");
            crate::agrigen::types::DashboardStats::default()
        }
    };

    DashboardTemplate {
        dash: Dash::new(admin, "/admin/dashboard"),
        stats: vec![
            StatCard {
                title: "Total Users",
                value: stats.total_users,
                icon: "users",
            },
            StatCard {
                title: "Products Listed",
                value: stats.total_products,
                icon: "package",
            },
            StatCard {
                title: "Total Orders",
                value: stats.total_orders,
                icon: "cart",
            },
            StatCard {
                title: "Active Alerts",
                value: stats.active_alerts,
                icon: "alert",
            },
        ],
    }
}
