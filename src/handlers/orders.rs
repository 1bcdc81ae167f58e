use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::models::OrderStatus;
use crate::services;
use crate::services::orders::OrderItemRequest;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct CreateOrderPayload {
    /// Defaults to the authenticated caller.
    pub user_id: Option<Uuid>,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
pub struct ConfirmPaymentPayload {
    pub external_payment_id: String,
}

#[derive(Deserialize)]
pub struct ApplyPromoPayload {
    pub code: String,
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = payload.user_id.unwrap_or(auth.user_id);
    let order = services::orders::create_order(&state.pool, user_id, &payload.items).await?;
    Ok(created(order, "Order created"))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = services::orders::list_orders(&state.pool, query.status).await?;
    Ok(success(orders, "Orders retrieved"))
}

pub async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let orders = services::orders::list_user_orders(&state.pool, user_id).await?;
    Ok(success(orders, "Orders retrieved"))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = services::orders::get_order(&state.pool, id).await?;
    Ok(success(order, "Order retrieved"))
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.external_payment_id.trim().is_empty() {
        return Err(AppError::Validation(
            "External payment id is required".to_string(),
        ));
    }
    let order =
        services::orders::process_payment(&state.pool, id, &payload.external_payment_id).await?;
    Ok(success(order, "Payment confirmed"))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = services::orders::cancel_order(&state.pool, id).await?;
    Ok(success(order, "Order cancelled"))
}

pub async fn apply_promo_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyPromoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = services::promo_codes::apply_promo_code(&state.pool, id, &payload.code).await?;
    Ok(success(order, "Promo code applied"))
}

pub async fn get_order_tickets(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tickets = services::orders::get_order_tickets(&state.pool, id).await?;
    Ok(success(tickets, "Tickets retrieved"))
}
