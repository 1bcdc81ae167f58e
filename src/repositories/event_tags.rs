use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::EventTag;

pub async fn create(conn: impl PgExecutor<'_>, name: &str) -> sqlx::Result<EventTag> {
    sqlx::query_as::<_, EventTag>(
        "INSERT INTO event_tags (name) VALUES ($1) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<EventTag>> {
    sqlx::query_as::<_, EventTag>("SELECT id, name FROM event_tags WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_name(conn: impl PgExecutor<'_>, name: &str) -> sqlx::Result<Option<EventTag>> {
    sqlx::query_as::<_, EventTag>("SELECT id, name FROM event_tags WHERE name = $1")
        .bind(name)
        .fetch_optional(conn)
        .await
}

pub async fn find_all(conn: impl PgExecutor<'_>) -> sqlx::Result<Vec<EventTag>> {
    sqlx::query_as::<_, EventTag>("SELECT id, name FROM event_tags ORDER BY name")
        .fetch_all(conn)
        .await
}

pub async fn find_by_event(conn: impl PgExecutor<'_>, event_id: Uuid) -> sqlx::Result<Vec<EventTag>> {
    sqlx::query_as::<_, EventTag>(
        "SELECT et.id, et.name
         FROM event_tags et
         JOIN event_tag_assignments eta ON eta.tag_id = et.id
         WHERE eta.event_id = $1
         ORDER BY et.name",
    )
    .bind(event_id)
    .fetch_all(conn)
    .await
}

pub async fn delete(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM event_tags WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Idempotent: assigning the same tag twice is a no-op.
pub async fn assign_to_event(
    conn: impl PgExecutor<'_>,
    event_id: Uuid,
    tag_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO event_tag_assignments (event_id, tag_id)
         VALUES ($1, $2)
         ON CONFLICT DO NOTHING",
    )
    .bind(event_id)
    .bind(tag_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn remove_from_event(
    conn: impl PgExecutor<'_>,
    event_id: Uuid,
    tag_id: Uuid,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "DELETE FROM event_tag_assignments WHERE event_id = $1 AND tag_id = $2",
    )
    .bind(event_id)
    .bind(tag_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
