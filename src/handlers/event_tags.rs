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
pub struct TagPayload {
    pub name: String,
}

pub async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tags = repositories::event_tags::find_all(&state.pool).await?;
    Ok(success(tags, "Tags retrieved"))
}

pub async fn create_tag(
    State(state): State<AppState>,
    Json(payload): Json<TagPayload>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }
    if repositories::event_tags::find_by_name(&state.pool, name)
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(format!("Tag '{name}'")));
    }
    let tag = repositories::event_tags::create(&state.pool, name).await?;
    Ok(created(tag, "Tag created"))
}

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tag = repositories::event_tags::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {id}")))?;
    Ok(success(tag, "Tag retrieved"))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = repositories::event_tags::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Tag {id}")));
    }
    Ok(empty_success("Tag deleted"))
}
