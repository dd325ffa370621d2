use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::models::CreateSpeaker;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{no_content, success};

/// Answers 204 with no body; the new speaker is only visible through the
/// listing endpoints.
pub async fn add_speaker(
    State(state): State<AppState>,
    event_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateSpeaker>, JsonRejection>,
) -> AppResult<Response> {
    let Path(event_id) = event_id?;
    let Json(input) = payload?;

    state
        .speaker_repository()
        .add_speaker(event_id, input)
        .await?;
    Ok(no_content())
}

pub async fn list_speakers(State(state): State<AppState>) -> AppResult<Response> {
    let speakers = state.speaker_repository().list_all_speakers().await?;
    Ok(success(speakers, "Speakers retrieved successfully"))
}
