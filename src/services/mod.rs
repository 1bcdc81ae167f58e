pub mod events;
pub mod orders;
pub mod promo_codes;
pub mod ticket_categories;
pub mod tickets;

use sqlx::{PgPool, Postgres, Transaction};

use crate::utils::error::AppError;

/// Opens a transaction at SERIALIZABLE isolation. Every pipeline operation
/// runs inside one of these; cross-operation exclusion is delegated to the
/// storage engine's serializable scheduler plus the guarded updates in the
/// ledgers.
pub(crate) async fn begin_serializable(
    pool: &PgPool,
) -> Result<Transaction<'_, Postgres>, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}
