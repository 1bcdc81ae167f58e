use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{DiscountType, PromoCode};

const COLUMNS: &str = "id, code, event_id, discount_type, discount_value, max_uses, used_count, \
                       valid_from, valid_until";

pub struct NewPromoCode {
    pub code: String,
    pub event_id: Option<Uuid>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_uses: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

pub async fn create(conn: impl PgExecutor<'_>, promo: NewPromoCode) -> sqlx::Result<PromoCode> {
    sqlx::query_as::<_, PromoCode>(&format!(
        "INSERT INTO promo_codes
             (code, event_id, discount_type, discount_value, max_uses, valid_from, valid_until)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    ))
    .bind(promo.code)
    .bind(promo.event_id)
    .bind(promo.discount_type)
    .bind(promo.discount_value)
    .bind(promo.max_uses)
    .bind(promo.valid_from)
    .bind(promo.valid_until)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<Option<PromoCode>> {
    sqlx::query_as::<_, PromoCode>(&format!("SELECT {COLUMNS} FROM promo_codes WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_code(
    conn: impl PgExecutor<'_>,
    code: &str,
) -> sqlx::Result<Option<PromoCode>> {
    sqlx::query_as::<_, PromoCode>(&format!("SELECT {COLUMNS} FROM promo_codes WHERE code = $1"))
        .bind(code)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_event(
    conn: impl PgExecutor<'_>,
    event_id: Uuid,
) -> sqlx::Result<Vec<PromoCode>> {
    sqlx::query_as::<_, PromoCode>(&format!(
        "SELECT {COLUMNS} FROM promo_codes WHERE event_id = $1 ORDER BY code"
    ))
    .bind(event_id)
    .fetch_all(conn)
    .await
}

pub async fn find_all(conn: impl PgExecutor<'_>) -> sqlx::Result<Vec<PromoCode>> {
    sqlx::query_as::<_, PromoCode>(&format!("SELECT {COLUMNS} FROM promo_codes ORDER BY code"))
        .fetch_all(conn)
        .await
}

pub async fn delete(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Promo-code ledger: guarded consumption of one use. Zero rows affected
/// means the usage limit was hit at write time.
pub async fn consume_use(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE promo_codes
         SET used_count = used_count + 1
         WHERE id = $1 AND (max_uses IS NULL OR used_count < max_uses)",
    )
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Promo-code ledger: give one use back when an order carrying this code is
/// cancelled.
pub async fn release_use(conn: impl PgExecutor<'_>, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE promo_codes
         SET used_count = used_count - 1
         WHERE id = $1 AND used_count > 0",
    )
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
