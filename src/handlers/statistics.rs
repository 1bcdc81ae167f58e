//! Read-only reporting endpoints backed by the statistics views. Only
//! confirmed orders count as sales; the views encode that rule.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::repositories;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize)]
pub struct EventSalesQuery {
    pub event_id: Option<Uuid>,
}

pub async fn event_sales(
    State(state): State<AppState>,
    Query(query): Query<EventSalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = match query.event_id {
        Some(event_id) => {
            repositories::statistics::event_sales_by_event(&state.pool, event_id).await?
        }
        None => repositories::statistics::event_sales(&state.pool).await?,
    };
    Ok(success(rows, "Event sales retrieved"))
}

pub async fn organizer_performance(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = repositories::statistics::organizer_performance(&state.pool).await?;
    Ok(success(rows, "Organizer performance retrieved"))
}

pub async fn organizer_performance_by_id(
    State(state): State<AppState>,
    Path(organizer_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row =
        repositories::statistics::organizer_performance_by_id(&state.pool, organizer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Organizer {organizer_id}")))?;
    Ok(success(row, "Organizer performance retrieved"))
}

pub async fn venue_utilization(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = repositories::statistics::venue_utilization(&state.pool).await?;
    Ok(success(rows, "Venue utilization retrieved"))
}

pub async fn venue_utilization_by_id(
    State(state): State<AppState>,
    Path(venue_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = repositories::statistics::venue_utilization_by_id(&state.pool, venue_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {venue_id}")))?;
    Ok(success(row, "Venue utilization retrieved"))
}

pub async fn promo_code_effectiveness(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = repositories::statistics::promo_code_effectiveness(&state.pool).await?;
    Ok(success(rows, "Promo code effectiveness retrieved"))
}

pub async fn promo_code_effectiveness_by_id(
    State(state): State<AppState>,
    Path(promo_code_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row =
        repositories::statistics::promo_code_effectiveness_by_id(&state.pool, promo_code_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Promo code {promo_code_id}")))?;
    Ok(success(row, "Promo code effectiveness retrieved"))
}
