use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "discount_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percent,
    Fixed,
}

/// A discount code. `event_id = None` means the code applies to items of
/// any event. `used_count` is only mutated through the guarded updates in
/// the promo-code repository.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromoCode {
    pub id: Uuid,
    pub code: String,
    pub event_id: Option<Uuid>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}
