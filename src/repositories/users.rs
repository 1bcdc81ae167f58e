use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::User;

const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, created_at";

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn create(conn: impl PgExecutor<'_>, user: NewUser) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, password_hash, first_name, last_name)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(user.username)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.first_name)
    .bind(user.last_name)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_username(
    conn: impl PgExecutor<'_>,
    username: &str,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_email(conn: impl PgExecutor<'_>, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(conn)
        .await
}

pub async fn find_all(conn: impl PgExecutor<'_>) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY created_at"))
        .fetch_all(conn)
        .await
}

/// Idempotent role grant; unknown role names are ignored.
pub async fn assign_role(
    conn: impl PgExecutor<'_>,
    user_id: Uuid,
    role_name: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role_id)
         SELECT $1, id FROM roles WHERE name = $2
         ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(role_name)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn role_names(conn: impl PgExecutor<'_>, user_id: Uuid) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT r.name
         FROM roles r
         JOIN user_roles ur ON ur.role_id = r.id
         WHERE ur.user_id = $1
         ORDER BY r.name",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}
