//! Supplier category panel.
//!
//! Categories are shared records; the supplier panel offers the same
//! CRUD as the admin one, stamped with the supplier's user id.

use agrizen_core::CategoryId;
use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::agrigen::AgrigenError;
use crate::error::{AppError, Result};
use crate::middleware::RequireSupplier;
use crate::routes::admin::categories::{CategoryForm, CategoryFormView, CategoryRow};
use crate::routes::admin::{ConfirmDeleteTemplate, Dash, PanelQuery};
use crate::state::AppState;

const PANEL_PATH: &str = "/supplier/categories";

/// Supplier categories template.
#[derive(Template, WebTemplate)]
#[template(path = "supplier/categories.html")]
pub struct SupplierCategoriesTemplate {
    pub dash: Dash,
    pub rows: Vec<CategoryRow>,
    pub page: Page,
    pub editing: Option<CategoryFormView>,
    pub error: Option<String>,
}

async fn render(
    state: &AppState,
    dash: Dash,
    query: &PanelQuery,
    error: Option<String>,
) -> Result<SupplierCategoriesTemplate> {
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

    Ok(SupplierCategoriesTemplate {
        dash,
        rows,
        page,
        editing,
        error,
    })
}

/// Display the supplier categories panel.
#[instrument(skip(supplier, state))]
pub async fn index(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<SupplierCategoriesTemplate> {
    render(&state, Dash::new(supplier, PANEL_PATH), &query, None).await
}

/// Create a category.
#[instrument(skip(supplier, state, form))]
pub async fn create(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let dash = Dash::new(supplier, PANEL_PATH);
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
#[instrument(skip(supplier, state, form))]
pub async fn update(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let dash = Dash::new(supplier, PANEL_PATH);
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
#[instrument(skip(supplier, state))]
pub async fn confirm_delete(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ConfirmDeleteTemplate> {
    let categories = state.agrigen().categories().await?;
    let category = categories
        .iter()
        .find(|c| c.id.as_i32() == id)
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

    Ok(ConfirmDeleteTemplate {
        dash: Dash::new(supplier, PANEL_PATH),
        resource: "category",
        label: category.name.clone(),
        action: format!("{PANEL_PATH}/{id}/delete"),
        cancel: PANEL_PATH,
    })
}

/// Delete a category.
#[instrument(skip(_supplier, state))]
pub async fn destroy(
    RequireSupplier(_supplier): RequireSupplier,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    state.agrigen().delete_category(CategoryId::new(id)).await?;
    Ok(Redirect::to(PANEL_PATH))
}
