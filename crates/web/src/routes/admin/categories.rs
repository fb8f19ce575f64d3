//! Category management panel.

use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use agrizen_core::{CategoryId, RecordStatus};
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
use crate::agrigen::types::CategoryPayload;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::CurrentUser;
use crate::state::AppState;

use super::{ConfirmDeleteTemplate, Dash, PanelQuery};

const PANEL_PATH: &str = "/admin/categories";

/// Table row.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub status: String,
}

/// Form prefill state when editing.
#[derive(Debug, Clone)]
pub struct CategoryFormView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub status: String,
}

/// Categories panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/categories.html")]
pub struct CategoriesTemplate {
    pub dash: Dash,
    pub rows: Vec<CategoryRow>,
    pub page: Page,
    pub editing: Option<CategoryFormView>,
    pub error: Option<String>,
}

/// Category create/update form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

impl CategoryForm {
    /// Required-field validation; an empty name is rejected before any
    /// network call is issued.
    fn validate(&self) -> std::result::Result<(String, RecordStatus), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Category name is required.".to_string());
        }
        let status = self.status.parse::<RecordStatus>().unwrap_or_default();
        Ok((name.to_string(), status))
    }

    pub(crate) fn payload(
        &self,
        id: Option<CategoryId>,
        user: &CurrentUser,
    ) -> std::result::Result<CategoryPayload, String> {
        let (name, status) = self.validate()?;
        Ok(CategoryPayload {
            id,
            name,
            description: self.description.trim().to_string(),
            user_id: Some(user.id),
            status,
        })
    }
}

async fn render(
    state: &AppState,
    dash: Dash,
    query: &PanelQuery,
    error: Option<String>,
) -> Result<CategoriesTemplate> {
    let categories = state.agrigen().categories().await?;

    let page = Page::resolve(categories.len(), PANEL_PAGE_SIZE, query.page());
    let rows = page
        .window(&categories)
        .iter()
        .map(|c| CategoryRow {
            id: c.id.as_i32(),
            name: c.name.clone(),
            description: c.description.clone(),
            status: c.status.clone(),
        })
        .collect();

    let editing = query.edit.and_then(|id| {
        categories
            .iter()
            .find(|c| c.id.as_i32() == id)
            .map(|c| CategoryFormView {
                id: c.id.as_i32(),
                name: c.name.clone(),
                description: c.description.clone(),
                status: c.status.clone(),
            })
    });

    Ok(CategoriesTemplate {
        dash,
        rows,
        page,
        editing,
        error,
    })
}

/// Display the categories panel.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<CategoriesTemplate> {
    render(&state, Dash::new(admin, PANEL_PATH), &query, None).await
}

/// Create a category.
#[instrument(skip(admin, state, form))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let dash = Dash::new(admin, PANEL_PATH);
    let payload = match form.payload(None, &dash.user) {
        Ok(payload) => payload,
        Err(message) => {
            return Ok(render(&state, dash, &PanelQuery::default(), Some(message))
                .await?
                .into_response());
        }
    };

    match state.agrigen().create_category(&payload).await {
        Ok(()) => Ok(Redirect::to(PANEL_PATH).into_response()),
        Err(AgrigenError::Api(f)) => {
            Ok(render(&state, dash, &PanelQuery::default(), Some(f.to_string()))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a category.
#[instrument(skip(admin, state, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let dash = Dash::new(admin, PANEL_PATH);
    let payload = match form.payload(Some(CategoryId::new(id)), &dash.user) {
        Ok(payload) => payload,
        Err(message) => {
            return Ok(render(&state, dash, &PanelQuery::default(), Some(message))
                .await?
                .into_response());
        }
    };

    match state.agrigen().update_category(&payload).await {
        Ok(()) => Ok(Redirect::to(PANEL_PATH).into_response()),
        Err(AgrigenError::Api(f)) => {
            Ok(render(&state, dash, &PanelQuery::default(), Some(f.to_string()))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Confirmation page before deleting a category.
#[instrument(skip(admin, state))]
pub async fn confirm_delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ConfirmDeleteTemplate> {
    let categories = state.agrigen().categories().await?;
    let category = categories
        .iter()
        .find(|c| c.id.as_i32() == id)
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

    Ok(ConfirmDeleteTemplate {
        dash: Dash::new(admin, PANEL_PATH),
        resource: "category",
        label: category.name.clone(),
        action: format!("{PANEL_PATH}/{id}/delete"),
        cancel: PANEL_PATH,
    })
}

/// Delete a category.
///
/// No client-side cascade: products referencing the category keep their
/// raw `category_id` until the backend says otherwise.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    state.agrigen().delete_category(CategoryId::new(id)).await?;
    Ok(Redirect::to(PANEL_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_is_rejected_before_any_request() {
        let form = CategoryForm {
            name: "  ".to_string(),
            description: "misc".to_string(),
            status: "active".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_valid_form_defaults_status() {
        let form = CategoryForm {
            name: "Seeds".to_string(),
            description: String::new(),
            status: "bogus".to_string(),
        };
        let (name, status) = form.validate().expect("valid");
        assert_eq!(name, "Seeds");
        assert_eq!(status, RecordStatus::Active);
    }
}
