//! Axum route handlers for the Collage API.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::card_names::handlers::parse_lang;
use crate::collage::compose::{compose_collage, OutputSize};
use crate::errors::AppError;
use crate::layout::{plan_collage, CollagePlan};
use crate::state::AppState;

pub const MAX_CARDS_PER_GROUP: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub offered_count: u32,
    pub wanted_count: u32,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupTitles {
    pub offered: String,
    pub wanted: String,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub plan: CollagePlan,
    pub titles: GroupTitles,
}

#[derive(Debug, Deserialize)]
pub struct CollageRequest {
    #[serde(default)]
    pub offered: Vec<String>,
    #[serde(default)]
    pub wanted: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_count(field: &str, count: usize) -> Result<(), AppError> {
    if count > MAX_CARDS_PER_GROUP {
        return Err(AppError::Validation(format!(
            "{field} cannot contain more than {MAX_CARDS_PER_GROUP} cards"
        )));
    }
    Ok(())
}

fn validate_card_ids(field: &str, ids: &[String]) -> Result<(), AppError> {
    validate_count(field, ids.len())?;
    let invalid = ids.iter().find(|id| {
        id.trim().is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });
    if let Some(id) = invalid {
        return Err(AppError::Validation(format!(
            "{field} contains an invalid card id '{id}'"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/collage/layout
///
/// Returns the collage plan for the given group sizes, plus localized group titles.
pub async fn handle_collage_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    validate_count("offered_count", request.offered_count as usize)?;
    validate_count("wanted_count", request.wanted_count as usize)?;
    let lang = parse_lang(request.lang.as_deref())?;

    let plan = plan_collage(request.offered_count, request.wanted_count, &state.canvas);
    let titles = GroupTitles {
        offered: state.translations.translate(lang, "collage.offered"),
        wanted: state.translations.translate(lang, "collage.wanted"),
    };

    Ok(Json(LayoutResponse { plan, titles }))
}

/// POST /api/v1/collage
///
/// Fetches every card image, composes the collage and returns it as PNG.
pub async fn handle_collage(
    State(state): State<AppState>,
    Json(request): Json<CollageRequest>,
) -> Result<Response, AppError> {
    validate_card_ids("offered", &request.offered)?;
    validate_card_ids("wanted", &request.wanted)?;
    if request.offered.is_empty() && request.wanted.is_empty() {
        return Err(AppError::Validation("At least one card must be selected".to_string()));
    }

    let plan = plan_collage(
        request.offered.len() as u32,
        request.wanted.len() as u32,
        &state.canvas,
    );

    let (offered_images, wanted_images) = tokio::join!(
        state.fetcher.fetch_all(&request.offered),
        state.fetcher.fetch_all(&request.wanted),
    );

    let background = state.background.as_ref().map(Arc::clone);
    let card_size = plan.card_size();
    let png = tokio::task::spawn_blocking(move || {
        compose_collage(
            &plan,
            &offered_images,
            &wanted_images,
            background.as_deref(),
            OutputSize::default(),
        )
    })
    .await
    .map_err(|e| anyhow!("collage composition task failed: {e}"))?
    .map_err(|e| anyhow!("collage composition failed: {e}"))?;

    info!(
        offered = request.offered.len(),
        wanted = request.wanted.len(),
        card_size,
        bytes = png.len(),
        "collage rendered"
    );

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_ids_accept_set_codes() {
        let ids = vec!["A1-094".to_string(), "P_A_001".to_string()];
        assert!(validate_card_ids("offered", &ids).is_ok());
    }

    #[test]
    fn test_card_ids_reject_paths_and_blanks() {
        assert!(validate_card_ids("offered", &["../secret".to_string()]).is_err());
        assert!(validate_card_ids("offered", &["  ".to_string()]).is_err());
    }

    #[test]
    fn test_group_size_is_capped() {
        let ids: Vec<String> = (0..=MAX_CARDS_PER_GROUP).map(|i| format!("c{i}")).collect();
        assert!(matches!(
            validate_card_ids("wanted", &ids),
            Err(AppError::Validation(_))
        ));
        assert!(validate_count("wanted_count", MAX_CARDS_PER_GROUP).is_ok());
    }
}
