use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::Organizer;

const COLUMNS: &str = "id, name, description, contact_email, contact_phone, user_id, created_at";

pub struct NewOrganizer {
    pub name: String,
    pub description: Option<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub user_id: Option<Uuid>,
}

pub async fn create(conn: impl PgExecutor<'_>, organizer: NewOrganizer) -> sqlx::Result<Organizer> {
    sqlx::query_as::<_, Organizer>(&format!(
        "INSERT INTO organizers (name, description, contact_email, contact_phone, user_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(organizer.name)
    .bind(organizer.description)
    .bind(organizer.contact_email)
    .bind(organizer.contact_phone)
    .bind(organizer.user_id)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<Organizer>> {
    sqlx::query_as::<_, Organizer>(&format!("SELECT {COLUMNS} FROM organizers WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_all(conn: impl PgExecutor<'_>) -> sqlx::Result<Vec<Organizer>> {
    sqlx::query_as::<_, Organizer>(&format!("SELECT {COLUMNS} FROM organizers ORDER BY name"))
        .fetch_all(conn)
        .await
}

pub async fn update(
    conn: impl PgExecutor<'_>,
    id: Uuid,
    organizer: NewOrganizer,
) -> sqlx::Result<Option<Organizer>> {
    sqlx::query_as::<_, Organizer>(&format!(
        "UPDATE organizers
         SET name = $1, description = $2, contact_email = $3, contact_phone = $4, user_id = $5
         WHERE id = $6
         RETURNING {COLUMNS}"
    ))
    .bind(organizer.name)
    .bind(organizer.description)
    .bind(organizer.contact_email)
    .bind(organizer.contact_phone)
    .bind(organizer.user_id)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM organizers WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
