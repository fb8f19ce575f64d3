//! User management panel.

use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use agrizen_core::{Role, UserId};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::agrigen::AgrigenError;
use crate::agrigen::types::UserPayload;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{ConfirmDeleteTemplate, Dash, PanelQuery};

const PANEL_PATH: &str = "/admin/users";

/// Table row.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

/// Form prefill state when editing.
#[derive(Debug, Clone)]
pub struct UserFormView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Users panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub dash: Dash,
    pub rows: Vec<UserRow>,
    pub page: Page,
    pub q: String,
    pub editing: Option<UserFormView>,
    pub error: Option<String>,
}

/// User create/update form data.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: String,
}

impl UserForm {
    /// Client-side validation, before any network call.
    fn validate(&self, creating: bool) -> std::result::Result<(String, String, Role), String> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() {
            return Err("Name is required.".to_string());
        }
        if email.is_empty() {
            return Err("Email is required.".to_string());
        }
        if creating && self.password.trim().is_empty() {
            return Err("Password is required.".to_string());
        }
        let role = self
            .role
            .parse::<Role>()
            .map_err(|_| "Please choose a valid role.".to_string())?;
        Ok((name.to_string(), email.to_string(), role))
    }
}

async fn render(
    state: &AppState,
    dash: Dash,
    query: &PanelQuery,
    error: Option<String>,
) -> Result<UsersTemplate> {
    let users = state.agrigen().users().await?;

    let q = query.search();
    let needle = q.to_lowercase();
    let filtered: Vec<_> = users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .collect();

    let page = Page::resolve(filtered.len(), PANEL_PAGE_SIZE, query.page());
    let rows = page
        .window(&filtered)
        .iter()
        .map(|u| UserRow {
            id: u.id.as_i32(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.clone(),
            created_at: u.created_at.clone(),
        })
        .collect();

    let editing = query.edit.and_then(|id| {
        users
            .iter()
            .find(|u| u.id.as_i32() == id)
            .map(|u| UserFormView {
                id: u.id.as_i32(),
                name: u.name.clone(),
                email: u.email.clone(),
                role: u.role.clone(),
            })
    });

    Ok(UsersTemplate {
        dash,
        rows,
        page,
        q,
        editing,
        error,
    })
}

/// Display the users panel.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<UsersTemplate> {
    render(&state, Dash::new(admin, PANEL_PATH), &query, None).await
}

/// Create a user.
#[instrument(skip(admin, state, form))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let dash = Dash::new(admin, PANEL_PATH);
    let (name, email, role) = match form.validate(true) {
        Ok(valid) => valid,
        Err(message) => {
            return Ok(render(&state, dash, &PanelQuery::default(), Some(message))
                .await?
                .into_response());
        }
    };

    let payload = UserPayload {
        id: None,
        name,
        email,
        password: Some(form.password),
        role,
    };

    match state.agrigen().create_user(&payload).await {
        Ok(()) => Ok(Redirect::to(PANEL_PATH).into_response()),
        Err(AgrigenError::Api(f)) => Ok(render(
            &state,
            Dash::new(dash.user, PANEL_PATH),
            &PanelQuery::default(),
            Some(f.to_string()),
        )
        .await?
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Update a user.
#[instrument(skip(admin, state, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let dash = Dash::new(admin, PANEL_PATH);
    let (name, email, role) = match form.validate(false) {
        Ok(valid) => valid,
        Err(message) => {
            return Ok(render(&state, dash, &PanelQuery::default(), Some(message))
                .await?
                .into_response());
        }
    };

    let password = if form.password.trim().is_empty() {
        None
    } else {
        Some(form.password)
    };

    let payload = UserPayload {
        id: Some(UserId::new(id)),
        name,
        email,
        password,
        role,
    };

    match state.agrigen().update_user(&payload).await {
        Ok(()) => Ok(Redirect::to(PANEL_PATH).into_response()),
        Err(AgrigenError::Api(f)) => Ok(render(
            &state,
            Dash::new(dash.user, PANEL_PATH),
            &PanelQuery::default(),
            Some(f.to_string()),
        )
        .await?
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Confirmation page before deleting a user.
#[instrument(skip(admin, state))]
pub async fn confirm_delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ConfirmDeleteTemplate> {
    let users = state.agrigen().users().await?;
    let user = users
        .iter()
        .find(|u| u.id.as_i32() == id)
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    Ok(ConfirmDeleteTemplate {
        dash: Dash::new(admin, PANEL_PATH),
        resource: "user",
        label: format!("{} ({})", user.name, user.email),
        action: format!("{PANEL_PATH}/{id}/delete"),
        cancel: PANEL_PATH,
    })
}

/// Delete a user.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    state.agrigen().delete_user(UserId::new(id)).await?;
    Ok(Redirect::to(PANEL_PATH))
}
