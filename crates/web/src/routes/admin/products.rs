//! Product management panel.
//!
//! Products are image-bearing: create and update go out as multipart. An
//! edit that picks no new file must resend the stored filename
//! (`existingImage`), or the backend record loses its image reference.

use std::collections::HashMap;

use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use agrizen_core::{CategoryId, ProductId, RecordStatus, UserId};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::agrigen::AgrigenError;
use crate::agrigen::types::{ImageUpload, ProductForm};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{ConfirmDeleteTemplate, Dash, PanelQuery, collect_multipart, require_field};

const PANEL_PATH: &str = "/admin/products";

/// Table row.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub unit: String,
    pub status: String,
    pub image_url: Option<String>,
}

/// Select option for the category dropdown.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: i32,
    pub name: String,
}

/// Form prefill state when editing.
#[derive(Debug, Clone)]
pub struct ProductFormView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category_id: i32,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub unit: String,
    pub status: String,
    pub existing_image: String,
    pub existing_image_url: Option<String>,
}

/// Products panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub dash: Dash,
    pub rows: Vec<ProductRow>,
    pub categories: Vec<CategoryOption>,
    pub page: Page,
    pub q: String,
    pub editing: Option<ProductFormView>,
    pub error: Option<String>,
}

/// Build a [`ProductForm`] from a drained multipart submission.
///
/// Validation runs here, before any network call. Shared with the
/// supplier panel, which submits the same form scoped to its own user.
pub(crate) fn parse_product_form(
    fields: &HashMap<String, String>,
    image: Option<ImageUpload>,
    id: Option<ProductId>,
    user_id: UserId,
) -> Result<ProductForm> {
    let name = require_field(fields, "name")?.to_string();
    let price: Decimal = require_field(fields, "price")?
        .parse()
        .map_err(|_| AppError::BadRequest("price must be a number".to_string()))?;
    let category_id: i32 = require_field(fields, "category_id")?
        .parse()
        .map_err(|_| AppError::BadRequest("category is required".to_string()))?;
    let stock_quantity: u32 = fields
        .get("stock_quantity")
        .map(String::as_str)
        .unwrap_or("0")
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("stock quantity must be a whole number".to_string()))?;
    let status = fields
        .get("status")
        .map(String::as_str)
        .unwrap_or("")
        .parse::<RecordStatus>()
        .unwrap_or_default();

    let existing_image = fields
        .get("existing_image")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(ProductForm {
        id,
        name,
        description: fields
            .get("description")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        category_id: CategoryId::new(category_id),
        price,
        stock_quantity,
        unit: fields
            .get("unit")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        status,
        user_id,
        image,
        existing_image,
    })
}

async fn render(
    state: &AppState,
    dash: Dash,
    query: &PanelQuery,
    error: Option<String>,
) -> Result<ProductsTemplate> {
    let products = state.agrigen().products(None).await?;
    let categories = state.agrigen().categories().await?;

    let category_names: HashMap<i32, String> = categories
        .iter()
        .map(|c| (c.id.as_i32(), c.name.clone()))
        .collect();

    let q = query.search();
    let needle = q.to_lowercase();
    let filtered: Vec<_> = products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect();

    let page = Page::resolve(filtered.len(), PANEL_PAGE_SIZE, query.page());
    let rows = page
        .window(&filtered)
        .iter()
        .map(|p| ProductRow {
            id: p.id.as_i32(),
            name: p.name.clone(),
            category: category_names
                .get(&p.category_id.as_i32())
                .cloned()
                .unwrap_or_else(|| p.category_id.to_string()),
            price: p.price,
            stock_quantity: p.stock_quantity,
            unit: p.unit.clone(),
            status: p.status.clone(),
            image_url: (!p.image.is_empty())
                .then(|| state.agrigen().upload_url("products", &p.image)),
        })
        .collect();

    let editing = query.edit.and_then(|id| {
        products
            .iter()
            .find(|p| p.id.as_i32() == id)
            .map(|p| ProductFormView {
                id: p.id.as_i32(),
                name: p.name.clone(),
                description: p.description.clone(),
                category_id: p.category_id.as_i32(),
                price: p.price,
                stock_quantity: p.stock_quantity,
                unit: p.unit.clone(),
                status: p.status.clone(),
                existing_image: p.image.clone(),
                existing_image_url: (!p.image.is_empty())
                    .then(|| state.agrigen().upload_url("products", &p.image)),
            })
    });

    Ok(ProductsTemplate {
        dash,
        rows,
        categories: categories
            .iter()
            .map(|c| CategoryOption {
                id: c.id.as_i32(),
                name: c.name.clone(),
            })
            .collect(),
        page,
        q,
        editing,
        error,
    })
}

/// Display the products panel.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<ProductsTemplate> {
    render(&state, Dash::new(admin, PANEL_PATH), &query, None).await
}

/// Create a product.
#[instrument(skip(admin, state, multipart))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let dash = Dash::new(admin, PANEL_PATH);
    let (fields, image) = collect_multipart(multipart).await?;

    let form = match parse_product_form(&fields, image, None, dash.user.id) {
        Ok(form) => form,
        Err(AppError::BadRequest(message)) => {
            return Ok(render(&state, dash, &PanelQuery::default(), Some(message))
                .await?
                .into_response());
        }
        Err(e) => return Err(e),
    };

    match state.agrigen().create_product(&form).await {
        Ok(()) => Ok(Redirect::to(PANEL_PATH).into_response()),
        Err(AgrigenError::Api(f)) => {
            Ok(render(&state, dash, &PanelQuery::default(), Some(f.to_string()))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a product.
#[instrument(skip(admin, state, multipart))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response> {
    let dash = Dash::new(admin, PANEL_PATH);
    let (fields, image) = collect_multipart(multipart).await?;

    let form = match parse_product_form(&fields, image, Some(ProductId::new(id)), dash.user.id) {
        Ok(form) => form,
        Err(AppError::BadRequest(message)) => {
            return Ok(render(&state, dash, &PanelQuery::default(), Some(message))
                .await?
                .into_response());
        }
        Err(e) => return Err(e),
    };

    match state.agrigen().update_product(&form).await {
        Ok(()) => Ok(Redirect::to(PANEL_PATH).into_response()),
        Err(AgrigenError::Api(f)) => {
            Ok(render(&state, dash, &PanelQuery::default(), Some(f.to_string()))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Confirmation page before deleting a product.
#[instrument(skip(admin, state))]
pub async fn confirm_delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ConfirmDeleteTemplate> {
    let products = state.agrigen().products(None).await?;
    let product = products
        .iter()
        .find(|p| p.id.as_i32() == id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ConfirmDeleteTemplate {
        dash: Dash::new(admin, PANEL_PATH),
        resource: "product",
        label: product.name.clone(),
        action: format!("{PANEL_PATH}/{id}/delete"),
        cancel: PANEL_PATH,
    })
}

/// Delete a product.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    state.agrigen().delete_product(ProductId::new(id)).await?;
    Ok(Redirect::to(PANEL_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base_fields() -> HashMap<String, String> {
        HashMap::from([
            ("name".to_string(), "Organic Wheat Seed".to_string()),
            ("description".to_string(), "Winter wheat".to_string()),
            ("category_id".to_string(), "2".to_string()),
            ("price".to_string(), "24.99".to_string()),
            ("stock_quantity".to_string(), "40".to_string()),
            ("unit".to_string(), "kg".to_string()),
            ("status".to_string(), "active".to_string()),
        ])
    }

    #[test]
    fn test_parse_valid_form() {
        let form =
            parse_product_form(&base_fields(), None, None, UserId::new(3)).unwrap();
        assert_eq!(form.name, "Organic Wheat Seed");
        assert_eq!(form.price, Decimal::new(2499, 2));
        assert_eq!(form.category_id, CategoryId::new(2));
        assert!(form.existing_image.is_none());
    }

    #[test]
    fn test_missing_name_is_rejected_locally() {
        let mut fields = base_fields();
        fields.insert("name".to_string(), "   ".to_string());
        let err = parse_product_form(&fields, None, None, UserId::new(3)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_existing_image_is_carried_on_edit() {
        let mut fields = base_fields();
        fields.insert("existing_image".to_string(), "wheat.jpg".to_string());
        let form = parse_product_form(&fields, None, Some(ProductId::new(9)), UserId::new(3))
            .unwrap();
        assert_eq!(form.existing_image.as_deref(), Some("wheat.jpg"));
    }

    #[test]
    fn test_non_numeric_price_is_rejected() {
        let mut fields = base_fields();
        fields.insert("price".to_string(), "a lot".to_string());
        assert!(parse_product_form(&fields, None, None, UserId::new(3)).is_err());
    }
}
