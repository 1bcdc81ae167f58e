use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{Payment, PaymentStatus};

const COLUMNS: &str = "id, order_id, external_payment_id, amount, status, paid_at";

pub async fn create(
    conn: impl PgExecutor<'_>,
    order_id: Uuid,
    amount: Decimal,
) -> sqlx::Result<Payment> {
    sqlx::query_as::<_, Payment>(&format!(
        "INSERT INTO payments (order_id, amount, status)
         VALUES ($1, $2, 'pending')
         RETURNING {COLUMNS}"
    ))
    .bind(order_id)
    .bind(amount)
    .fetch_one(conn)
    .await
}

pub async fn find_by_order(
    conn: impl PgExecutor<'_>,
    order_id: Uuid,
) -> sqlx::Result<Option<Payment>> {
    sqlx::query_as::<_, Payment>(&format!("SELECT {COLUMNS} FROM payments WHERE order_id = $1"))
        .bind(order_id)
        .fetch_optional(conn)
        .await
}

pub async fn update_status(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    status: PaymentStatus,
) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE payments SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Marks the payment succeeded and records the opaque gateway reference.
pub async fn mark_succeeded(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    external_payment_id: &str,
    paid_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE payments
         SET status = 'succeeded', external_payment_id = $1, paid_at = $2
         WHERE id = $3",
    )
    .bind(external_payment_id)
    .bind(paid_at)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
