use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::i18n::{Language, DEFAULT_LANGUAGE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CardNameResponse {
    pub card_id: String,
    pub lang: Language,
    pub name: String,
}

/// Parses an optional `lang` query value, defaulting to Japanese.
pub fn parse_lang(lang: Option<&str>) -> Result<Language, AppError> {
    match lang {
        None => Ok(DEFAULT_LANGUAGE),
        Some(code) => Language::from_code(code)
            .ok_or_else(|| AppError::Validation(format!("Unsupported language '{code}'"))),
    }
}

/// GET /api/v1/cards/:id/name
pub async fn handle_card_name(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    Query(params): Query<LangQuery>,
) -> Result<Json<CardNameResponse>, AppError> {
    let lang = parse_lang(params.lang.as_deref())?;

    let name = state
        .card_names
        .lookup(&card_id, lang)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Card {card_id} not found")))?;

    Ok(Json(CardNameResponse {
        card_id,
        lang,
        name,
    }))
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub cards: usize,
}

/// POST /api/v1/card-names/reload
///
/// Drops the cached dictionary and loads it again from its source.
pub async fn handle_reload_card_names(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    state.card_names.invalidate().await;
    let names = state.card_names.names().await?;
    Ok(Json(ReloadResponse { cards: names.len() }))
}
