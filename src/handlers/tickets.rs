use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::services;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize)]
pub struct AttendeePayload {
    pub attendee_name: String,
    pub attendee_email: Option<String>,
}

pub async fn get_ticket_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = services::tickets::get_by_code(&state.pool, &code).await?;
    Ok(success(ticket, "Ticket retrieved"))
}

pub async fn check_in_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = services::tickets::check_in(&state.pool, id).await?;
    Ok(success(ticket, "Ticket checked in"))
}

pub async fn assign_attendee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendeePayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.attendee_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Attendee name must not be empty".to_string(),
        ));
    }
    let ticket = services::tickets::assign_attendee(
        &state.pool,
        id,
        &payload.attendee_name,
        payload.attendee_email.as_deref(),
    )
    .await?;
    Ok(success(ticket, "Attendee assigned"))
}
