use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::mirror::{validate_comment, MirrorComment};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MirrorResponse {
    pub mirrored: bool,
    pub thread_id: String,
}

/// POST /api/v1/mirror/comments
///
/// Replays a comment onto the linked external forum thread.
pub async fn handle_mirror_comment(
    State(state): State<AppState>,
    Json(request): Json<MirrorComment>,
) -> Result<Json<MirrorResponse>, AppError> {
    validate_comment(&request)?;

    let client = state.mirror.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Comment mirroring is not configured".to_string())
    })?;

    client.post_comment(&request).await?;

    Ok(Json(MirrorResponse {
        mirrored: true,
        thread_id: request.thread_id.trim().to_string(),
    }))
}
