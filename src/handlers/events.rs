use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::EventStatus;
use crate::repositories;
use crate::repositories::events::NewEvent;
use crate::services;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct EventPayload {
    pub title: String,
    pub description: Option<String>,
    pub organizer_id: Uuid,
    pub venue_id: Option<Uuid>,
    pub start_datetime: DateTime<Utc>,
}

impl EventPayload {
    fn into_new(self, status: EventStatus) -> NewEvent {
        NewEvent {
            title: self.title,
            description: self.description,
            organizer_id: self.organizer_id,
            venue_id: self.venue_id,
            start_datetime: self.start_datetime,
            event_status: status,
        }
    }
}

#[derive(Deserialize)]
pub struct ListEventsQuery {
    pub status: Option<EventStatus>,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let events = services::events::list_events(&state.pool, query.status).await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let event = services::events::get_event(&state.pool, id).await?;
    Ok(success(event, "Event retrieved"))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".to_string()));
    }
    let event =
        services::events::create_event(&state.pool, payload.into_new(EventStatus::Draft)).await?;
    Ok(created(event, "Event created"))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let existing = services::events::get_event(&state.pool, id).await?;
    let event = services::events::update_event(
        &state.pool,
        id,
        payload.into_new(existing.event_status),
    )
    .await?;
    Ok(success(event, "Event updated"))
}

#[derive(Deserialize)]
pub struct StatusPayload {
    pub status: EventStatus,
}

/// Publishing and cancelling both go through the status transition
/// endpoint; cancellation cascades over the event's pending orders.
pub async fn update_event_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = match payload.status {
        EventStatus::Published => services::events::publish_event(&state.pool, id).await?,
        EventStatus::Cancelled => services::events::cancel_event(&state.pool, id).await?,
        EventStatus::Draft => {
            return Err(AppError::InvalidState(
                "Events cannot be reverted to draft".to_string(),
            ))
        }
    };
    Ok(success(event, "Event status updated"))
}

pub async fn list_published_events(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let events =
        services::events::list_events(&state.pool, Some(EventStatus::Published)).await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn list_events_by_organizer(
    State(state): State<AppState>,
    Path(organizer_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    repositories::organizers::find_by_id(&state.pool, organizer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organizer {organizer_id}")))?;
    let events = services::events::list_by_organizer(&state.pool, organizer_id).await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    services::events::delete_event(&state.pool, id).await?;
    Ok(empty_success("Event deleted"))
}

pub async fn get_event_tags(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    services::events::get_event(&state.pool, id).await?;
    let tags = repositories::event_tags::find_by_event(&state.pool, id).await?;
    Ok(success(tags, "Tags retrieved"))
}

pub async fn assign_tag(
    State(state): State<AppState>,
    Path((event_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    services::events::get_event(&state.pool, event_id).await?;
    repositories::event_tags::find_by_id(&state.pool, tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {tag_id}")))?;
    repositories::event_tags::assign_to_event(&state.pool, event_id, tag_id).await?;
    Ok(empty_success("Tag assigned"))
}

pub async fn remove_tag(
    State(state): State<AppState>,
    Path((event_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let removed =
        repositories::event_tags::remove_from_event(&state.pool, event_id, tag_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!(
            "Tag {tag_id} on event {event_id}"
        )));
    }
    Ok(empty_success("Tag removed"))
}
