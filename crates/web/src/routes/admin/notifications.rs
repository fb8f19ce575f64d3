//! Notification management panel.

use agrizen_core::NotificationId;
use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{ConfirmDeleteTemplate, Dash, PanelQuery};

const PANEL_PATH: &str = "/admin/notifications";

/// Table row.
#[derive(Debug, Clone)]
pub struct NotificationRow {
    pub id: i32,
    pub name: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

/// Notifications panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/notifications.html")]
pub struct NotificationsTemplate {
    pub dash: Dash,
    pub rows: Vec<NotificationRow>,
    pub page: Page,
}

/// Display the notifications panel.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<NotificationsTemplate> {
    let notifications = state.agrigen().notifications().await?;

    let page = Page::resolve(notifications.len(), PANEL_PAGE_SIZE, query.page());
    let rows = page
        .window(&notifications)
        .iter()
        .map(|n| NotificationRow {
            id: n.notification_id.as_i32(),
            name: n.name.clone(),
            message: n.message.clone(),
            is_read: n.is_read,
            created_at: n.created_at.clone(),
        })
        .collect();

    Ok(NotificationsTemplate {
        dash: Dash::new(admin, PANEL_PATH),
        rows,
        page,
    })
}

/// Read-toggle form data: the state the row should move to.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub mark_read: u8,
}

/// Flip the read flag on a notification.
#[instrument(skip(_admin, state))]
pub async fn toggle_read(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect> {
    state
        .agrigen()
        .mark_notification(NotificationId::new(id), form.mark_read != 0)
        .await?;
    Ok(Redirect::to(PANEL_PATH))
}

/// Confirmation page before deleting a notification.
#[instrument(skip(admin, state))]
pub async fn confirm_delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ConfirmDeleteTemplate> {
    let notifications = state.agrigen().notifications().await?;
    let notification = notifications
        .iter()
        .find(|n| n.notification_id.as_i32() == id)
        .ok_or_else(|| AppError::NotFound(format!("notification {id}")))?;

    Ok(ConfirmDeleteTemplate {
        dash: Dash::new(admin, PANEL_PATH),
        resource: "notification",
        label: notification.message.clone(),
        action: format!("{PANEL_PATH}/{id}/delete"),
        cancel: PANEL_PATH,
    })
}

/// Delete a notification.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    state
        .agrigen()
        .delete_notification(NotificationId::new(id))
        .await?;
    Ok(Redirect::to(PANEL_PATH))
}
