//! Supplier product panel: the admin product panel scoped to the
//! session user's own records.

use std::collections::HashMap;

use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use agrizen_core::{ProductId, UserId};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::agrigen::AgrigenError;
use crate::agrigen::types::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireSupplier;
use crate::routes::admin::products::{CategoryOption, ProductFormView, ProductRow};
use crate::routes::admin::{ConfirmDeleteTemplate, Dash, PanelQuery, collect_multipart};
use crate::state::AppState;

const PANEL_PATH: &str = "/supplier/products";

/// Keep only the products owned by the session user.
///
/// The fetch already asks the backend to scope by `user_id`, but the raw
/// response can include other suppliers' records; this filter is what the
/// panel actually trusts.
pub fn scoped_products(products: Vec<Product>, owner: UserId) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| p.user_id == owner)
        .collect()
}

/// Supplier products template.
#[derive(Template, WebTemplate)]
#[template(path = "supplier/products.html")]
pub struct SupplierProductsTemplate {
    pub dash: Dash,
    pub rows: Vec<ProductRow>,
    pub categories: Vec<CategoryOption>,
    pub page: Page,
    pub q: String,
    pub editing: Option<ProductFormView>,
    pub error: Option<String>,
}

async fn render(
    state: &AppState,
    dash: Dash,
    query: &PanelQuery,
    error: Option<String>,
) -> Result<SupplierProductsTemplate> {
    let owner = dash.user.id;
    let products = scoped_products(state.agrigen().products(Some(owner)).await?, owner);
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

    Ok(SupplierProductsTemplate {
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

/// Display the supplier's products.
#[instrument(skip(supplier, state))]
pub async fn index(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<SupplierProductsTemplate> {
    render(&state, Dash::new(supplier, PANEL_PATH), &query, None).await
}

/// Create a product owned by the supplier.
#[instrument(skip(supplier, state, multipart))]
pub async fn create(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let dash = Dash::new(supplier, PANEL_PATH);
    let (fields, image) = collect_multipart(multipart).await?;

    let form = match crate::routes::admin::products::parse_product_form(
        &fields,
        image,
        None,
        dash.user.id,
    ) {
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

/// Update one of the supplier's own products.
#[instrument(skip(supplier, state, multipart))]
pub async fn update(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response> {
    let dash = Dash::new(supplier, PANEL_PATH);
    let owner = dash.user.id;
    require_ownership(&state, owner, id).await?;

    let (fields, image) = collect_multipart(multipart).await?;
    let form = match crate::routes::admin::products::parse_product_form(
        &fields,
        image,
        Some(ProductId::new(id)),
        owner,
    ) {
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

/// Confirmation page before deleting one of the supplier's own products.
#[instrument(skip(supplier, state))]
pub async fn confirm_delete(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ConfirmDeleteTemplate> {
    let owner = supplier.id;
    let products = scoped_products(state.agrigen().products(Some(owner)).await?, owner);
    let product = products
        .iter()
        .find(|p| p.id.as_i32() == id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ConfirmDeleteTemplate {
        dash: Dash::new(supplier, PANEL_PATH),
        resource: "product",
        label: product.name.clone(),
        action: format!("{PANEL_PATH}/{id}/delete"),
        cancel: PANEL_PATH,
    })
}

/// Delete one of the supplier's own products.
#[instrument(skip(supplier, state))]
pub async fn destroy(
    RequireSupplier(supplier): RequireSupplier,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    require_ownership(&state, supplier.id, id).await?;
    state.agrigen().delete_product(ProductId::new(id)).await?;
    Ok(Redirect::to(PANEL_PATH))
}

/// Refuse mutations against records the supplier does not own.
async fn require_ownership(state: &AppState, owner: UserId, id: i32) -> Result<()> {
    let products = scoped_products(state.agrigen().products(Some(owner)).await?, owner);
    if products.iter().any(|p| p.id.as_i32() == id) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("product {id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agrizen_core::CategoryId;
    use rust_decimal::Decimal;

    fn product(id: i32, owner: i32, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            category_id: CategoryId::new(1),
            price: Decimal::new(1000, 2),
            stock_quantity: 5,
            unit: "kg".to_string(),
            status: "active".to_string(),
            created_at: String::new(),
            user_id: UserId::new(owner),
            image: String::new(),
        }
    }

    #[test]
    fn test_only_owned_products_survive_the_scope_filter() {
        // The raw response mixes in other suppliers' records.
        let raw = vec![
            product(1, 12, "My Seeds"),
            product(2, 99, "Someone Else's Seeds"),
            product(3, 12, "My Fertilizer"),
        ];
        let scoped = scoped_products(raw, UserId::new(12));
        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().all(|p| p.user_id == UserId::new(12)));
    }

    #[test]
    fn test_scope_filter_can_empty_the_list() {
        let raw = vec![product(2, 99, "Someone Else's Seeds")];
        assert!(scoped_products(raw, UserId::new(12)).is_empty());
    }
}
