//! Supplier profile page.
//!
//! Same shared profile form as the admin variant, in supplier chrome.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;

use crate::middleware::RequireSupplier;
use crate::routes::admin::Dash;
use crate::routes::profile::MessageQuery;

/// Supplier profile template.
#[derive(Template, WebTemplate)]
#[template(path = "supplier/profile.html")]
pub struct SupplierProfileTemplate {
    pub dash: Dash,
    pub success: Option<String>,
}

/// Display the profile form in dashboard chrome.
pub async fn show(
    RequireSupplier(supplier): RequireSupplier,
    Query(query): Query<MessageQuery>,
) -> SupplierProfileTemplate {
    let success = query.success.as_deref().and_then(|code| match code {
        "profile" => Some("Profile updated.".to_string()),
        "password" => Some("Password changed.".to_string()),
        _ => None,
    });

    SupplierProfileTemplate {
        dash: Dash::new(supplier, "/supplier/profile"),
        success,
    }
}
