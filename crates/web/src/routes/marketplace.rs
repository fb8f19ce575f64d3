//! Marketplace listing and product detail.
//!
//! The whole catalog is fetched per page load; the category and free-text
//! filters are applied in memory over that list, so filtering is instant
//! but the full catalog always travels. That ceiling is inherited from
//! the system this one mirrors.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::agrigen::types::{MarketProduct, Product};
use crate::error::Result;
use crate::filters;
use crate::models::nav::Nav;
use crate::state::AppState;

/// Sentinel for "no category filter".
const ALL_CATEGORIES: &str = "All";

/// Filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Product card for the listing grid.
#[derive(Debug, Clone)]
pub struct MarketCard {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: rust_decimal::Decimal,
    pub category: String,
    pub unit: String,
    pub image_url: String,
}

/// Apply the category and free-text filters in memory.
pub fn filter_products<'a>(
    products: &'a [MarketProduct],
    category: &str,
    query: &str,
) -> Vec<&'a MarketProduct> {
    let query = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| category == ALL_CATEGORIES || p.category == category)
        .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
        .collect()
}

/// Marketplace listing template.
#[derive(Template, WebTemplate)]
#[template(path = "marketplace/index.html")]
pub struct MarketplaceTemplate {
    pub nav: Nav,
    pub products: Vec<MarketCard>,
    pub categories: Vec<String>,
    pub selected_category: String,
    pub query: String,
}

/// Product detail view.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: rust_decimal::Decimal,
    pub unit: String,
    pub stock_quantity: u32,
    pub image_url: String,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "marketplace/show.html")]
pub struct ProductDetailTemplate {
    pub nav: Nav,
    pub product: ProductView,
}

/// Display the marketplace listing.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<FilterQuery>,
) -> Result<MarketplaceTemplate> {
    let nav = Nav::load(&session).await;

    let products = state.agrigen().marketplace().await?;
    let category_list = state.agrigen().categories().await?;

    let mut categories = vec![ALL_CATEGORIES.to_string()];
    categories.extend(category_list.into_iter().map(|c| c.name));

    let selected_category = query
        .category
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let search = query.q.unwrap_or_default();

    let cards = filter_products(&products, &selected_category, &search)
        .into_iter()
        .map(|p| MarketCard {
            id: p.id.as_i32(),
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            category: p.category.clone(),
            unit: p.unit.clone(),
            image_url: state.agrigen().upload_url("products", &p.image),
        })
        .collect();

    Ok(MarketplaceTemplate {
        nav,
        products: cards,
        categories,
        selected_category,
        query: search,
    })
}

/// Display a single product.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<ProductDetailTemplate> {
    let nav = Nav::load(&session).await;
    let product: Product = state
        .agrigen()
        .product_details(agrizen_core::ProductId::new(id))
        .await?;

    let view = ProductView {
        id: product.id.as_i32(),
        name: product.name,
        description: product.description,
        price: product.price,
        unit: product.unit,
        stock_quantity: product.stock_quantity,
        image_url: state.agrigen().upload_url("products", &product.image),
    };

    Ok(ProductDetailTemplate { nav, product: view })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agrizen_core::ProductId;

    fn product(name: &str, category: &str) -> MarketProduct {
        MarketProduct {
            id: ProductId::new(1),
            name: name.to_string(),
            description: String::new(),
            price: "10.00".parse().unwrap(),
            category: category.to_string(),
            unit: "kg".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_all_category_passes_everything() {
        let products = vec![product("Wheat Seed", "Seeds"), product("Urea", "Fertilizer")];
        assert_eq!(filter_products(&products, "All", "").len(), 2);
    }

    #[test]
    fn test_category_filter_matches_exactly() {
        let products = vec![product("Wheat Seed", "Seeds"), product("Urea", "Fertilizer")];
        let filtered = filter_products(&products, "Seeds", "");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().name, "Wheat Seed");
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let products = vec![product("Wheat Seed", "Seeds"), product("Urea", "Fertilizer")];
        assert_eq!(filter_products(&products, "All", "wheat").len(), 1);
        assert_eq!(filter_products(&products, "All", "EED").len(), 1);
        assert!(filter_products(&products, "All", "tractor").is_empty());
    }

    #[test]
    fn test_filters_compose() {
        let products = vec![
            product("Wheat Seed", "Seeds"),
            product("Rice Seed", "Seeds"),
            product("Wheat Flour", "Produce"),
        ];
        let filtered = filter_products(&products, "Seeds", "wheat");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().name, "Wheat Seed");
    }
}
