use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::DiscountType;
use crate::repositories::promo_codes::NewPromoCode;
use crate::services;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct PromoCodePayload {
    pub code: String,
    pub event_id: Option<Uuid>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_uses: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

fn validate(payload: &PromoCodePayload) -> Result<(), AppError> {
    if payload.code.trim().is_empty() {
        return Err(AppError::Validation("Code must not be empty".to_string()));
    }
    if payload.discount_value <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Discount value must be positive".to_string(),
        ));
    }
    if payload.discount_type == DiscountType::Percent
        && payload.discount_value > Decimal::from(100)
    {
        return Err(AppError::Validation(
            "Percent discount cannot exceed 100".to_string(),
        ));
    }
    if let Some(max_uses) = payload.max_uses {
        if max_uses <= 0 {
            return Err(AppError::Validation(
                "Max uses must be positive".to_string(),
            ));
        }
    }
    if let (Some(from), Some(until)) = (payload.valid_from, payload.valid_until) {
        if from > until {
            return Err(AppError::Validation(
                "Valid-from must not be after valid-until".to_string(),
            ));
        }
    }
    Ok(())
}

pub async fn list_promo_codes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let promos = services::promo_codes::list_promo_codes(&state.pool).await?;
    Ok(success(promos, "Promo codes retrieved"))
}

pub async fn get_promo_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let promo = services::promo_codes::get_promo_code(&state.pool, id).await?;
    Ok(success(promo, "Promo code retrieved"))
}

pub async fn get_promo_code_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let promo = crate::repositories::promo_codes::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promo code '{code}'")))?;
    Ok(success(promo, "Promo code retrieved"))
}

pub async fn list_promo_codes_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let promos = services::promo_codes::list_for_event(&state.pool, event_id).await?;
    Ok(success(promos, "Promo codes retrieved"))
}

pub async fn create_promo_code(
    State(state): State<AppState>,
    Json(payload): Json<PromoCodePayload>,
) -> Result<impl IntoResponse, AppError> {
    validate(&payload)?;
    let promo = services::promo_codes::create_promo_code(
        &state.pool,
        NewPromoCode {
            code: payload.code,
            event_id: payload.event_id,
            discount_type: payload.discount_type,
            discount_value: payload.discount_value,
            max_uses: payload.max_uses,
            valid_from: payload.valid_from,
            valid_until: payload.valid_until,
        },
    )
    .await?;
    Ok(created(promo, "Promo code created"))
}

pub async fn delete_promo_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    services::promo_codes::delete_promo_code(&state.pool, id).await?;
    Ok(empty_success("Promo code deleted"))
}
