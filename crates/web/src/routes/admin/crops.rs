//! Crop management panel.
//!
//! Crops are image-bearing like products, but their controller encodes
//! update-intent as a `_method=PUT` override on a `POST` (the client
//! handles that quirk).

use std::collections::HashMap;

use agrizen_core::CropId;
use agrizen_core::paging::{PANEL_PAGE_SIZE, Page};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::agrigen::AgrigenError;
use crate::agrigen::types::{CropForm, ImageUpload};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{ConfirmDeleteTemplate, Dash, PanelQuery, collect_multipart, require_field};

const PANEL_PATH: &str = "/admin/crops";

/// Table row.
#[derive(Debug, Clone)]
pub struct CropRow {
    pub id: i32,
    pub name: String,
    pub variety: String,
    pub season: String,
    pub duration_days: u32,
    pub region: String,
    pub image_url: Option<String>,
}

/// Form prefill state when editing.
#[derive(Debug, Clone)]
pub struct CropFormView {
    pub id: i32,
    pub name: String,
    pub variety: String,
    pub season: String,
    pub duration_days: u32,
    pub region: String,
    pub soil_type: String,
    pub sowing_method: String,
    pub yield_kg_per_hectare: Decimal,
    pub description: String,
    pub existing_image: String,
    pub existing_image_url: Option<String>,
}

/// Crops panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/crops.html")]
pub struct CropsPanelTemplate {
    pub dash: Dash,
    pub rows: Vec<CropRow>,
    pub page: Page,
    pub q: String,
    pub editing: Option<CropFormView>,
    pub error: Option<String>,
}

/// Build a [`CropForm`] from a drained multipart submission.
fn parse_crop_form(
    fields: &HashMap<String, String>,
    image: Option<ImageUpload>,
    id: Option<CropId>,
) -> Result<CropForm> {
    let name = require_field(fields, "name")?.to_string();

    let text = |key: &str| {
        fields
            .get(key)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let duration_days: u32 = fields
        .get("duration_days")
        .map(String::as_str)
        .unwrap_or("0")
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("duration must be a whole number of days".to_string()))?;

    let yield_kg_per_hectare: Decimal = fields
        .get("yield_kg_per_hectare")
        .map(String::as_str)
        .unwrap_or("0")
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("yield must be a number".to_string()))?;

    let existing_image = fields
        .get("existing_image")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(CropForm {
        id,
        name,
        variety: text("variety"),
        season: text("season"),
        duration_days,
        region: text("region"),
        soil_type: text("soil_type"),
        sowing_method: text("sowing_method"),
        yield_kg_per_hectare,
        description: text("description"),
        image,
        existing_image,
    })
}

async fn render(
    state: &AppState,
    dash: Dash,
    query: &PanelQuery,
    error: Option<String>,
) -> Result<CropsPanelTemplate> {
    let crops = state.agrigen().crops().await?;

    let q = query.search();
    let needle = q.to_lowercase();
    let filtered: Vec<_> = crops
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.variety.to_lowercase().contains(&needle)
        })
        .collect();

    let page = Page::resolve(filtered.len(), PANEL_PAGE_SIZE, query.page());
    let rows = page
        .window(&filtered)
        .iter()
        .map(|c| CropRow {
            id: c.id.as_i32(),
            name: c.name.clone(),
            variety: c.variety.clone(),
            season: c.season.clone(),
            duration_days: c.duration_days,
            region: c.region.clone(),
            image_url: (!c.image.is_empty())
                .then(|| state.agrigen().upload_url("crops", &c.image)),
        })
        .collect();

    let editing = query.edit.and_then(|id| {
        crops.iter().find(|c| c.id.as_i32() == id).map(|c| CropFormView {
            id: c.id.as_i32(),
            name: c.name.clone(),
            variety: c.variety.clone(),
            season: c.season.clone(),
            duration_days: c.duration_days,
            region: c.region.clone(),
            soil_type: c.soil_type.clone(),
            sowing_method: c.sowing_method.clone(),
            yield_kg_per_hectare: c.yield_kg_per_hectare,
            description: c.description.clone(),
            existing_image: c.image.clone(),
            existing_image_url: (!c.image.is_empty())
                .then(|| state.agrigen().upload_url("crops", &c.image)),
        })
    });

    Ok(CropsPanelTemplate {
        dash,
        rows,
        page,
        q,
        editing,
        error,
    })
}

/// Display the crops panel.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<CropsPanelTemplate> {
    render(&state, Dash::new(admin, PANEL_PATH), &query, None).await
}

/// Create a crop.
#[instrument(skip(admin, state, multipart))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let dash = Dash::new(admin, PANEL_PATH);
    let (fields, image) = collect_multipart(multipart).await?;

    let form = match parse_crop_form(&fields, image, None) {
        Ok(form) => form,
        Err(AppError::BadRequest(message)) => {
            return Ok(render(&state, dash, &PanelQuery::default(), Some(message))
                .await?
                .into_response());
        }
        Err(e) => return Err(e),
    };

    match state.agrigen().create_crop(&form).await {
        Ok(()) => Ok(Redirect::to(PANEL_PATH).into_response()),
        Err(AgrigenError::Api(f)) => {
            Ok(render(&state, dash, &PanelQuery::default(), Some(f.to_string()))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a crop.
#[instrument(skip(admin, state, multipart))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response> {
    let dash = Dash::new(admin, PANEL_PATH);
    let (fields, image) = collect_multipart(multipart).await?;

    let form = match parse_crop_form(&fields, image, Some(CropId::new(id))) {
        Ok(form) => form,
        Err(AppError::BadRequest(message)) => {
            return Ok(render(&state, dash, &PanelQuery::default(), Some(message))
                .await?
                .into_response());
        }
        Err(e) => return Err(e),
    };

    match state.agrigen().update_crop(&form).await {
        Ok(()) => Ok(Redirect::to(PANEL_PATH).into_response()),
        Err(AgrigenError::Api(f)) => {
            Ok(render(&state, dash, &PanelQuery::default(), Some(f.to_string()))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Confirmation page before deleting a crop.
#[instrument(skip(admin, state))]
pub async fn confirm_delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ConfirmDeleteTemplate> {
    let crops = state.agrigen().crops().await?;
    let crop = crops
        .iter()
        .find(|c| c.id.as_i32() == id)
        .ok_or_else(|| AppError::NotFound(format!("crop {id}")))?;

    Ok(ConfirmDeleteTemplate {
        dash: Dash::new(admin, PANEL_PATH),
        resource: "crop",
        label: crop.name.clone(),
        action: format!("{PANEL_PATH}/{id}/delete"),
        cancel: PANEL_PATH,
    })
}

/// Delete a crop.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    state.agrigen().delete_crop(CropId::new(id)).await?;
    Ok(Redirect::to(PANEL_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crop_form_defaults_numeric_fields() {
        let fields = HashMap::from([("name".to_string(), "Rice".to_string())]);
        let form = parse_crop_form(&fields, None, None).unwrap();
        assert_eq!(form.duration_days, 0);
        assert_eq!(form.yield_kg_per_hectare, Decimal::ZERO);
    }

    #[test]
    fn test_parse_crop_form_requires_name() {
        let fields = HashMap::new();
        assert!(parse_crop_form(&fields, None, None).is_err());
    }
}
