use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::repositories::ticket_categories::NewTicketCategory;
use crate::services;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct TicketCategoryPayload {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity_available: i32,
    pub sale_start_date: Option<DateTime<Utc>>,
    pub sale_end_date: Option<DateTime<Utc>>,
}

impl TicketCategoryPayload {
    fn into_new(self) -> NewTicketCategory {
        NewTicketCategory {
            name: self.name,
            description: self.description,
            price: self.price,
            quantity_available: self.quantity_available,
            sale_start_date: self.sale_start_date,
            sale_end_date: self.sale_end_date,
        }
    }
}

pub async fn list_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let categories = services::ticket_categories::list_for_event(&state.pool, event_id).await?;
    Ok(success(categories, "Ticket categories retrieved"))
}

pub async fn create_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<TicketCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let category =
        services::ticket_categories::create_category(&state.pool, event_id, payload.into_new())
            .await?;
    Ok(created(category, "Ticket category created"))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let category = services::ticket_categories::get_category(&state.pool, id).await?;
    Ok(success(category, "Ticket category retrieved"))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let category =
        services::ticket_categories::update_category(&state.pool, id, payload.into_new()).await?;
    Ok(success(category, "Ticket category updated"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    services::ticket_categories::delete_category(&state.pool, id).await?;
    Ok(empty_success("Ticket category deleted"))
}
