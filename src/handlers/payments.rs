use axum::extract::{Path, State};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::repositories;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn get_payment_for_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payment = repositories::payments::find_by_order(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment for order {order_id}")))?;
    Ok(success(payment, "Payment retrieved"))
}
