use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::repositories;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct VenuePayload {
    pub name: String,
    pub address: String,
    pub capacity: i32,
}

fn validate(payload: &VenuePayload) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }
    if payload.capacity <= 0 {
        return Err(AppError::Validation(
            "Capacity must be positive".to_string(),
        ));
    }
    Ok(())
}

pub async fn list_venues(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let venues = repositories::venues::find_all(&state.pool).await?;
    Ok(success(venues, "Venues retrieved"))
}

pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let venue = repositories::venues::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {id}")))?;
    Ok(success(venue, "Venue retrieved"))
}

pub async fn create_venue(
    State(state): State<AppState>,
    Json(payload): Json<VenuePayload>,
) -> Result<impl IntoResponse, AppError> {
    validate(&payload)?;
    let venue = repositories::venues::create(
        &state.pool,
        &payload.name,
        &payload.address,
        payload.capacity,
    )
    .await?;
    Ok(created(venue, "Venue created"))
}

pub async fn update_venue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VenuePayload>,
) -> Result<impl IntoResponse, AppError> {
    validate(&payload)?;
    let venue = repositories::venues::update(
        &state.pool,
        id,
        &payload.name,
        &payload.address,
        payload.capacity,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Venue {id}")))?;
    Ok(success(venue, "Venue updated"))
}

pub async fn delete_venue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = repositories::venues::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Venue {id}")));
    }
    Ok(empty_success("Venue deleted"))
}
