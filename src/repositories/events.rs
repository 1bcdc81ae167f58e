use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{Event, EventStatus};

const COLUMNS: &str =
    "id, title, description, organizer_id, venue_id, start_datetime, event_status, created_at";

pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub organizer_id: Uuid,
    pub venue_id: Option<Uuid>,
    pub start_datetime: chrono::DateTime<chrono::Utc>,
    pub event_status: EventStatus,
}

pub async fn create(conn: impl PgExecutor<'_>, event: NewEvent) -> sqlx::Result<Event> {
    sqlx::query_as::<_, Event>(&format!(
        "INSERT INTO events (title, description, organizer_id, venue_id, start_datetime, event_status)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {COLUMNS}"
    ))
    .bind(event.title)
    .bind(event.description)
    .bind(event.organizer_id)
    .bind(event.venue_id)
    .bind(event.start_datetime)
    .bind(event.event_status)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Event>> {
    sqlx::query_as::<_, Event>(&format!("SELECT {COLUMNS} FROM events WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_all(conn: impl PgExecutor<'_>) -> sqlx::Result<Vec<Event>> {
    sqlx::query_as::<_, Event>(&format!(
        "SELECT {COLUMNS} FROM events ORDER BY start_datetime DESC"
    ))
    .fetch_all(conn)
    .await
}

pub async fn find_by_organizer(
    conn: impl PgExecutor<'_>,
    organizer_id: Uuid,
) -> sqlx::Result<Vec<Event>> {
    sqlx::query_as::<_, Event>(&format!(
        "SELECT {COLUMNS} FROM events WHERE organizer_id = $1 ORDER BY start_datetime DESC"
    ))
    .bind(organizer_id)
    .fetch_all(conn)
    .await
}

pub async fn find_by_status(
    conn: impl PgExecutor<'_>,
    status: EventStatus,
) -> sqlx::Result<Vec<Event>> {
    sqlx::query_as::<_, Event>(&format!(
        "SELECT {COLUMNS} FROM events WHERE event_status = $1 ORDER BY start_datetime DESC"
    ))
    .bind(status)
    .fetch_all(conn)
    .await
}

pub async fn update(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    event: NewEvent,
) -> sqlx::Result<Option<Event>> {
    sqlx::query_as::<_, Event>(&format!(
        "UPDATE events
         SET title = $1, description = $2, organizer_id = $3, venue_id = $4,
             start_datetime = $5, event_status = $6
         WHERE id = $7
         RETURNING {COLUMNS}"
    ))
    .bind(event.title)
    .bind(event.description)
    .bind(event.organizer_id)
    .bind(event.venue_id)
    .bind(event.start_datetime)
    .bind(event.event_status)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn update_status(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    status: EventStatus,
) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE events SET event_status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Orders of any status that reference this event through their items.
pub async fn count_orders(conn: impl PgExecutor<'_>, event_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT o.id)
         FROM orders o
         JOIN order_items oi ON oi.order_id = o.id
         JOIN ticket_categories tc ON tc.id = oi.ticket_category_id
         WHERE tc.event_id = $1",
    )
    .bind(event_id)
    .fetch_one(conn)
    .await
}

pub async fn count_confirmed_orders(
    conn: impl PgExecutor<'_>,
    event_id: Uuid,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT o.id)
         FROM orders o
         JOIN order_items oi ON oi.order_id = o.id
         JOIN ticket_categories tc ON tc.id = oi.ticket_category_id
         WHERE tc.event_id = $1 AND o.status = 'confirmed'",
    )
    .bind(event_id)
    .fetch_one(conn)
    .await
}
