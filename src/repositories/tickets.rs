use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{Ticket, TicketStatus};

const COLUMNS: &str = "id, ticket_code, order_item_id, attendee_name, attendee_email, status";

/// Inserts a single ticket row. The UNIQUE constraint on `ticket_code` is
/// the real uniqueness guarantee; the generator's entropy only makes
/// collisions unlikely.
pub async fn create(
    conn: impl PgExecutor<'_>,
    ticket_code: &str,
    order_item_id: Uuid,
) -> sqlx::Result<Ticket> {
    sqlx::query_as::<_, Ticket>(&format!(
        "INSERT INTO tickets (ticket_code, order_item_id, status)
         VALUES ($1, $2, 'active')
         RETURNING {COLUMNS}"
    ))
    .bind(ticket_code)
    .bind(order_item_id)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Ticket>> {
    sqlx::query_as::<_, Ticket>(&format!("SELECT {COLUMNS} FROM tickets WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_code(conn: impl PgExecutor<'_>, code: &str) -> sqlx::Result<Option<Ticket>> {
    sqlx::query_as::<_, Ticket>(&format!("SELECT {COLUMNS} FROM tickets WHERE ticket_code = $1"))
        .bind(code)
        .fetch_optional(conn)
        .await
}

/// All tickets belonging to an order, across its items.
pub async fn find_by_order(conn: impl PgExecutor<'_>, order_id: Uuid) -> sqlx::Result<Vec<Ticket>> {
    sqlx::query_as::<_, Ticket>(
        "SELECT t.id, t.ticket_code, t.order_item_id, t.attendee_name, t.attendee_email, t.status
         FROM tickets t
         JOIN order_items oi ON oi.id = t.order_item_id
         WHERE oi.order_id = $1
         ORDER BY t.ticket_code",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await
}

pub async fn update_status(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    status: TicketStatus,
) -> sqlx::Result<Option<Ticket>> {
    sqlx::query_as::<_, Ticket>(&format!(
        "UPDATE tickets SET status = $1 WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn batch_update_status(
    conn: impl PgExecutor<'_>,
    ids: &[Uuid],
    status: TicketStatus,
) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE tickets SET status = $1 WHERE id = ANY($2)")
        .bind(status)
        .bind(ids)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn set_attendee(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    attendee_name: &str,
    attendee_email: Option<&str>,
) -> sqlx::Result<Option<Ticket>> {
    sqlx::query_as::<_, Ticket>(&format!(
        "UPDATE tickets SET attendee_name = $1, attendee_email = $2 WHERE id = $3 RETURNING {COLUMNS}"
    ))
    .bind(attendee_name)
    .bind(attendee_email)
    .bind(id)
    .fetch_optional(conn)
    .await
}
