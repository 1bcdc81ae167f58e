use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::Venue;

const COLUMNS: &str = "id, name, address, capacity, created_at";

pub async fn create(
    conn: impl PgExecutor<'_>,
    name: &str,
    address: &str,
    capacity: i32,
) -> sqlx::Result<Venue> {
    sqlx::query_as::<_, Venue>(&format!(
        "INSERT INTO venues (name, address, capacity)
         VALUES ($1, $2, $3)
         RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(address)
    .bind(capacity)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Venue>> {
    sqlx::query_as::<_, Venue>(&format!("SELECT {COLUMNS} FROM venues WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_all(conn: impl PgExecutor<'_>) -> sqlx::Result<Vec<Venue>> {
    sqlx::query_as::<_, Venue>(&format!("SELECT {COLUMNS} FROM venues ORDER BY name"))
        .fetch_all(conn)
        .await
}

pub async fn update(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    name: &str,
    address: &str,
    capacity: i32,
) -> sqlx::Result<Option<Venue>> {
    sqlx::query_as::<_, Venue>(&format!(
        "UPDATE venues
         SET name = $1, address = $2, capacity = $3
         WHERE id = $4
         RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(address)
    .bind(capacity)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM venues WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
