//! Admin profile page.
//!
//! Renders the shared profile form inside the dashboard chrome; the form
//! posts to the same `/profile` endpoints every role uses.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;

use crate::middleware::RequireAdmin;
use crate::routes::profile::MessageQuery;

use super::Dash;

/// Admin profile template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/profile.html")]
pub struct AdminProfileTemplate {
    pub dash: Dash,
    pub success: Option<String>,
}

/// Display the profile form in dashboard chrome.
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> AdminProfileTemplate {
    let success = query.success.as_deref().and_then(|code| match code {
        "profile" => Some("Profile updated.".to_string()),
        "password" => Some("Password changed.".to_string()),
        _ => None,
    });

    AdminProfileTemplate {
        dash: Dash::new(admin, "/admin/profile"),
        success,
    }
}
