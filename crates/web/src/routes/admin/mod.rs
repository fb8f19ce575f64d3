//! Admin dashboard panels.
//!
//! Every panel follows the same contract: fetch the full collection,
//! filter and paginate it in memory (page size 5), validate required
//! fields before any network call, and after every successful mutation
//! redirect back to the listing so it re-fetches - the whole list is the
//! cache, and every mutation invalidates it. Destructive actions route
//! through a confirmation page first.

pub mod categories;
pub mod crops;
pub mod dashboard;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod profile;
pub mod users;

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::Multipart,
    routing::{get, post},
};
use serde::Deserialize;

use crate::agrigen::types::ImageUpload;
use crate::error::{AppError, Result};
use crate::models::CurrentUser;
use crate::models::nav::{MenuItem, sidebar_items};
use crate::state::AppState;

/// Create the admin dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/profile", get(profile::show))
        .route("/users", get(users::index).post(users::create))
        .route("/users/{id}", post(users::update))
        .route(
            "/users/{id}/delete",
            get(users::confirm_delete).post(users::destroy),
        )
        .route("/categories", get(categories::index).post(categories::create))
        .route("/categories/{id}", post(categories::update))
        .route(
            "/categories/{id}/delete",
            get(categories::confirm_delete).post(categories::destroy),
        )
        .route("/products", get(products::index).post(products::create))
        .route("/products/{id}", post(products::update))
        .route(
            "/products/{id}/delete",
            get(products::confirm_delete).post(products::destroy),
        )
        .route("/crops", get(crops::index).post(crops::create))
        .route("/crops/{id}", post(crops::update))
        .route(
            "/crops/{id}/delete",
            get(crops::confirm_delete).post(crops::destroy),
        )
        .route("/orders", get(orders::index))
        .route("/orders/{id}/status", post(orders::update_status))
        .route(
            "/orders/{id}/delete",
            get(orders::confirm_delete).post(orders::destroy),
        )
        .route("/notifications", get(notifications::index))
        .route("/notifications/{id}/read", post(notifications::toggle_read))
        .route(
            "/notifications/{id}/delete",
            get(notifications::confirm_delete).post(notifications::destroy),
        )
}

/// Dashboard chrome context: the signed-in user plus the sidebar.
#[derive(Debug, Clone)]
pub struct Dash {
    pub user: CurrentUser,
    pub menu: &'static [MenuItem],
    pub current_path: &'static str,
}

impl Dash {
    /// Build the chrome for the given page path.
    #[must_use]
    pub fn new(user: CurrentUser, current_path: &'static str) -> Self {
        let menu = sidebar_items(user.role);
        Self {
            user,
            menu,
            current_path,
        }
    }
}

/// Listing query parameters shared by the panels.
#[derive(Debug, Default, Deserialize)]
pub struct PanelQuery {
    /// 1-based page number.
    pub page: Option<usize>,
    /// Substring search, where the panel has one.
    pub q: Option<String>,
    /// Record id whose values prefill the form for editing.
    pub edit: Option<i32>,
}

impl PanelQuery {
    /// Requested page, defaulting to the first.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// Trimmed search string.
    #[must_use]
    pub fn search(&self) -> String {
        self.q
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }
}

/// Confirmation page rendered before every delete. No undo exists, so
/// nothing is deleted on a GET.
#[derive(Template, WebTemplate)]
#[template(path = "admin/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub dash: Dash,
    /// Resource noun, e.g. "category".
    pub resource: &'static str,
    /// Human-readable identification of the record.
    pub label: String,
    /// POST target that performs the delete.
    pub action: String,
    /// Where "Cancel" returns to.
    pub cancel: &'static str,
}

/// Drain a multipart form into its text fields and the optional image.
///
/// Field parts named `image` with a filename and content become the
/// upload; everything else is treated as text.
pub(crate) async fn collect_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Option<ImageUpload>)> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !file_name.is_empty() && !bytes.is_empty() {
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, image))
}

/// Read a required text field out of a drained multipart form.
pub(crate) fn require_field<'a>(
    fields: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str> {
    let value = fields.get(name).map(String::as_str).unwrap_or("").trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{name} is required")));
    }
    Ok(value)
}
