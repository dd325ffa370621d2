use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{CreateEvent, UpdateEvent};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, no_content, success};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEventQuery {
    #[serde(default)]
    pub show_deleted: bool,
}

pub async fn list_events(State(state): State<AppState>) -> AppResult<Response> {
    let events = state.event_repository().list().await?;
    Ok(success(events, "Events retrieved successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<GetEventQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Query(query) = query?;

    let event = state
        .event_repository()
        .get_by_id(id, query.show_deleted)
        .await?;
    Ok(success(event, "Event retrieved successfully"))
}

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEvent>, JsonRejection>,
) -> AppResult<Response> {
    let Json(input) = payload?;

    let event = state.event_repository().create(input).await?;
    let location = format!("/api/dev-events/{}", event.id);
    Ok(created(event, &location, "Event created successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateEvent>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(fields) = payload?;

    state.event_repository().update(id, fields).await?;
    Ok(no_content())
}

pub async fn delete_event(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;

    state.event_repository().delete(id).await?;
    Ok(no_content())
}
