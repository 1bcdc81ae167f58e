use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::repositories;
use crate::repositories::organizers::NewOrganizer;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct OrganizerPayload {
    pub name: String,
    pub description: Option<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub user_id: Option<Uuid>,
}

impl OrganizerPayload {
    fn into_new(self) -> NewOrganizer {
        NewOrganizer {
            name: self.name,
            description: self.description,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            user_id: self.user_id,
        }
    }
}

pub async fn list_organizers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let organizers = repositories::organizers::find_all(&state.pool).await?;
    Ok(success(organizers, "Organizers retrieved"))
}

pub async fn get_organizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let organizer = repositories::organizers::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organizer {id}")))?;
    Ok(success(organizer, "Organizer retrieved"))
}

pub async fn create_organizer(
    State(state): State<AppState>,
    Json(payload): Json<OrganizerPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }
    let organizer = repositories::organizers::create(&state.pool, payload.into_new()).await?;
    Ok(created(organizer, "Organizer created"))
}

pub async fn update_organizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrganizerPayload>,
) -> Result<impl IntoResponse, AppError> {
    let organizer = repositories::organizers::update(&state.pool, id, payload.into_new())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organizer {id}")))?;
    Ok(success(organizer, "Organizer updated"))
}

pub async fn delete_organizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = repositories::organizers::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Organizer {id}")));
    }
    Ok(empty_success("Organizer deleted"))
}
