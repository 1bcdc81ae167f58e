use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A priced admission tier with finite stock. `quantity_available` is only
/// ever mutated through the guarded updates in the ticket-category
/// repository, never by direct assignment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketCategory {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity_available: i32,
    pub sale_start_date: Option<DateTime<Utc>>,
    pub sale_end_date: Option<DateTime<Utc>>,
}
