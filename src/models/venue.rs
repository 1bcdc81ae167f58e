use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}
