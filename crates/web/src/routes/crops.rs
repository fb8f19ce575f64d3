//! Public crop guide.
//!
//! Read-only listing of the crop records with a season filter and a
//! name/variety search, both applied in memory over the full fetch.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::agrigen::types::Crop;
use crate::error::Result;
use crate::models::nav::Nav;
use crate::state::AppState;

/// Sentinel for "no season filter".
const ALL_SEASONS: &str = "All";

/// Filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CropQuery {
    pub season: Option<String>,
    pub q: Option<String>,
}

/// Crop card for the guide grid.
#[derive(Debug, Clone)]
pub struct CropCard {
    pub name: String,
    pub variety: String,
    pub season: String,
    pub duration_days: u32,
    pub region: String,
    pub description: String,
    pub image_url: String,
}

/// Apply the season and search filters in memory.
pub fn filter_crops<'a>(crops: &'a [Crop], season: &str, query: &str) -> Vec<&'a Crop> {
    let query = query.trim().to_lowercase();
    crops
        .iter()
        .filter(|c| {
            season == ALL_SEASONS || c.season.trim().eq_ignore_ascii_case(season.trim())
        })
        .filter(|c| {
            query.is_empty()
                || c.name.to_lowercase().contains(&query)
                || c.variety.to_lowercase().contains(&query)
        })
        .collect()
}

/// Crop guide template.
#[derive(Template, WebTemplate)]
#[template(path = "crops/index.html")]
pub struct CropsTemplate {
    pub nav: Nav,
    pub crops: Vec<CropCard>,
    pub seasons: Vec<String>,
    pub selected_season: String,
    pub query: String,
}

/// Display the crop guide.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CropQuery>,
) -> Result<CropsTemplate> {
    let crops = state.agrigen().crops().await?;

    // Distinct seasons, insertion-ordered, for the filter control.
    let mut seasons = vec![ALL_SEASONS.to_string()];
    for crop in &crops {
        let season = crop.season.trim();
        if !season.is_empty() && !seasons.iter().any(|s| s.eq_ignore_ascii_case(season)) {
            seasons.push(season.to_string());
        }
    }

    let selected_season = query.season.unwrap_or_else(|| ALL_SEASONS.to_string());
    let search = query.q.unwrap_or_default();

    let cards = filter_crops(&crops, &selected_season, &search)
        .into_iter()
        .map(|c| CropCard {
            name: c.name.clone(),
            variety: c.variety.clone(),
            season: c.season.clone(),
            duration_days: c.duration_days,
            region: c.region.clone(),
            description: c.description.clone(),
            image_url: state.agrigen().upload_url("crops", &c.image),
        })
        .collect();

    Ok(CropsTemplate {
        nav: Nav::load(&session).await,
        crops: cards,
        seasons,
        selected_season,
        query: search,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agrizen_core::CropId;

    fn crop(name: &str, variety: &str, season: &str) -> Crop {
        Crop {
            id: CropId::new(1),
            name: name.to_string(),
            variety: variety.to_string(),
            season: season.to_string(),
            duration_days: 120,
            region: String::new(),
            soil_type: String::new(),
            sowing_method: String::new(),
            yield_kg_per_hectare: rust_decimal::Decimal::ZERO,
            description: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_season_filter_ignores_case_and_whitespace() {
        let crops = vec![crop("Rice", "Basmati", " Kharif "), crop("Wheat", "Durum", "Rabi")];
        let filtered = filter_crops(&crops, "kharif", "");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().name, "Rice");
    }

    #[test]
    fn test_search_matches_name_or_variety() {
        let crops = vec![crop("Rice", "Basmati", "Kharif"), crop("Wheat", "Durum", "Rabi")];
        assert_eq!(filter_crops(&crops, "All", "basmati").len(), 1);
        assert_eq!(filter_crops(&crops, "All", "whe").len(), 1);
        assert!(filter_crops(&crops, "All", "cotton").is_empty());
    }
}
