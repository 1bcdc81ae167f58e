use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::TicketCategory;

const COLUMNS: &str =
    "id, event_id, name, description, price, quantity_available, sale_start_date, sale_end_date";

pub struct NewTicketCategory {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity_available: i32,
    pub sale_start_date: Option<DateTime<Utc>>,
    pub sale_end_date: Option<DateTime<Utc>>,
}

pub async fn create(
    conn: impl PgExecutor<'_>,
    event_id: Uuid,
    category: NewTicketCategory,
) -> sqlx::Result<TicketCategory> {
    sqlx::query_as::<_, TicketCategory>(&format!(
        "INSERT INTO ticket_categories
             (event_id, name, description, price, quantity_available, sale_start_date, sale_end_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    ))
    .bind(event_id)
    .bind(category.name)
    .bind(category.description)
    .bind(category.price)
    .bind(category.quantity_available)
    .bind(category.sale_start_date)
    .bind(category.sale_end_date)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(
    conn: impl PgExecutor<'_>,
    id: Uuid,
) -> sqlx::Result<Option<TicketCategory>> {
    sqlx::query_as::<_, TicketCategory>(&format!(
        "SELECT {COLUMNS} FROM ticket_categories WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn find_by_event(
    conn: impl PgExecutor<'_>,
    event_id: Uuid,
) -> sqlx::Result<Vec<TicketCategory>> {
    sqlx::query_as::<_, TicketCategory>(&format!(
        "SELECT {COLUMNS} FROM ticket_categories WHERE event_id = $1 ORDER BY price"
    ))
    .bind(event_id)
    .fetch_all(conn)
    .await
}

pub async fn update(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    category: NewTicketCategory,
) -> sqlx::Result<Option<TicketCategory>> {
    sqlx::query_as::<_, TicketCategory>(&format!(
        "UPDATE ticket_categories
         SET name = $1, description = $2, price = $3, quantity_available = $4,
             sale_start_date = $5, sale_end_date = $6
         WHERE id = $7
         RETURNING {COLUMNS}"
    ))
    .bind(category.name)
    .bind(category.description)
    .bind(category.price)
    .bind(category.quantity_available)
    .bind(category.sale_start_date)
    .bind(category.sale_end_date)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM ticket_categories WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Inventory ledger: guarded decrement. Zero rows affected means the guard
/// failed (insufficient stock at write time) and the enclosing transaction
/// must abort. This is the sole admission-control mechanism; it stays
/// correct even under isolation weaker than serializable.
pub async fn reserve(conn: impl PgExecutor<'_>, id: Uuid, quantity: i32) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE ticket_categories
         SET quantity_available = quantity_available - $1
         WHERE id = $2 AND quantity_available >= $1",
    )
    .bind(quantity)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Inventory ledger: unconditional increment used on cancellation reversal.
/// Zero rows affected means the category row no longer exists.
pub async fn release(conn: impl PgExecutor<'_>, id: Uuid, quantity: i32) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE ticket_categories
         SET quantity_available = quantity_available + $1
         WHERE id = $2",
    )
    .bind(quantity)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
