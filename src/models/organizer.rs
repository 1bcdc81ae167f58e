use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organizer {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
