use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::OrderItem;

const COLUMNS: &str = "id, order_id, ticket_category_id, quantity, unit_price, promo_code_id";

pub async fn create(
    conn: impl PgExecutor<'_>,
    order_id: Uuid,
    ticket_category_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
) -> sqlx::Result<OrderItem> {
    sqlx::query_as::<_, OrderItem>(&format!(
        "INSERT INTO order_items (order_id, ticket_category_id, quantity, unit_price)
         VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(order_id)
    .bind(ticket_category_id)
    .bind(quantity)
    .bind(unit_price)
    .fetch_one(conn)
    .await
}

pub async fn find_by_order(conn: impl PgExecutor<'_>, order_id: Uuid) -> sqlx::Result<Vec<OrderItem>> {
    sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {COLUMNS} FROM order_items WHERE order_id = $1"
    ))
    .bind(order_id)
    .fetch_all(conn)
    .await
}

pub async fn count_by_ticket_category(
    conn: impl PgExecutor<'_>,
    ticket_category_id: Uuid,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM order_items WHERE ticket_category_id = $1",
    )
    .bind(ticket_category_id)
    .fetch_one(conn)
    .await
}

/// Records the applied promo on a set of items in one statement.
pub async fn set_promo_code(
    conn: impl PgExecutor<'_>,
    item_ids: &[Uuid],
    promo_code_id: Uuid,
) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE order_items SET promo_code_id = $1 WHERE id = ANY($2)")
        .bind(promo_code_id)
        .bind(item_ids)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
