use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

const COLUMNS: &str = "id, order_number, user_id, status, total_amount, created_at";

pub async fn create(
    conn: impl PgExecutor<'_>,
    order_number: &str,
    user_id: Uuid,
    total_amount: Decimal,
) -> sqlx::Result<Order> {
    sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders (order_number, user_id, status, total_amount)
         VALUES ($1, $2, 'pending', $3)
         RETURNING {COLUMNS}"
    ))
    .bind(order_number)
    .bind(user_id)
    .bind(total_amount)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Order>> {
    sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_all(conn: impl PgExecutor<'_>) -> sqlx::Result<Vec<Order>> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders ORDER BY created_at DESC"
    ))
    .fetch_all(conn)
    .await
}

pub async fn find_by_user(conn: impl PgExecutor<'_>, user_id: Uuid) -> sqlx::Result<Vec<Order>> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(conn)
    .await
}

pub async fn find_by_status(
    conn: impl PgExecutor<'_>,
    status: OrderStatus,
) -> sqlx::Result<Vec<Order>> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE status = $1 ORDER BY created_at DESC"
    ))
    .bind(status)
    .fetch_all(conn)
    .await
}

/// Orders touching an event through their items, filtered by status. Used
/// by the event-cancellation cascade.
pub async fn find_by_event_and_status(
    conn: impl PgExecutor<'_>,
    event_id: Uuid,
    status: OrderStatus,
) -> sqlx::Result<Vec<Order>> {
    sqlx::query_as::<_, Order>(
        "SELECT DISTINCT o.id, o.order_number, o.user_id, o.status, o.total_amount, o.created_at
         FROM orders o
         JOIN order_items oi ON oi.order_id = o.id
         JOIN ticket_categories tc ON tc.id = oi.ticket_category_id
         WHERE tc.event_id = $1 AND o.status = $2
         ORDER BY o.created_at DESC",
    )
    .bind(event_id)
    .bind(status)
    .fetch_all(conn)
    .await
}

pub async fn update_status(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    status: OrderStatus,
) -> sqlx::Result<Option<Order>> {
    sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders SET status = $1 WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn update_total_amount(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    total_amount: Decimal,
) -> sqlx::Result<Option<Order>> {
    sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders SET total_amount = $1 WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(total_amount)
    .bind(id)
    .fetch_optional(conn)
    .await
}
