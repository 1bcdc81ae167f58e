//! Promo-code ledger and application. A code is consumed once per order,
//! no matter how many items it discounts; the guarded `used_count` update
//! is what enforces the usage cap under concurrency.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{DiscountType, Order, OrderItem, OrderStatus, PromoCode};
use crate::repositories;
use crate::repositories::promo_codes::NewPromoCode;
use crate::services::begin_serializable;
use crate::utils::error::AppError;

/// Applies a promo code to a pending order: records the code on every
/// applicable item, consumes exactly one use, and reprices the order. Runs
/// as a single serializable transaction.
pub async fn apply_promo_code(
    pool: &PgPool,
    order_id: Uuid,
    code: &str,
) -> Result<Order, AppError> {
    let mut tx = begin_serializable(pool).await?;

    let promo = repositories::promo_codes::find_by_code(&mut *tx, code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promo code '{code}'")))?;

    let order = repositories::orders::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;

    if order.status != OrderStatus::Pending {
        return Err(AppError::InvalidState(format!(
            "Promo codes can only be applied to pending orders, order is {}",
            order.status.as_str()
        )));
    }

    let items = repositories::order_items::find_by_order(&mut *tx, order_id).await?;

    if items.iter().any(|item| item.promo_code_id.is_some()) {
        return Err(AppError::PromoAlreadyApplied);
    }

    // An event-scoped code discounts only items of that event; a global
    // code (event_id = NULL) discounts everything.
    let mut applicable: Vec<OrderItem> = Vec::with_capacity(items.len());
    for item in items {
        let category =
            repositories::ticket_categories::find_by_id(&mut *tx, item.ticket_category_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Ticket category {}", item.ticket_category_id))
                })?;
        match promo.event_id {
            Some(event_id) if event_id != category.event_id => {}
            _ => applicable.push(item),
        }
    }

    if applicable.is_empty() {
        return Err(AppError::PromoNotApplicable);
    }

    check_validity(&promo, Utc::now())?;

    let consumed = repositories::promo_codes::consume_use(&mut *tx, promo.id).await?;
    if consumed == 0 {
        return Err(AppError::UsageLimitExceeded);
    }

    let discount = compute_discount(&promo, &applicable);

    let item_ids: Vec<Uuid> = applicable.iter().map(|item| item.id).collect();
    repositories::order_items::set_promo_code(&mut *tx, &item_ids, promo.id).await?;

    let new_total = (order.total_amount - discount).max(Decimal::ZERO);
    let order = repositories::orders::update_total_amount(&mut *tx, order_id, new_total)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;

    tx.commit().await?;

    tracing::info!(
        order_id = %order_id,
        promo_code = %promo.code,
        discount = %discount,
        "Promo code applied"
    );
    Ok(order)
}

/// Time-window check. An expired code stays expired even if its start date
/// is also in the future, so expiry is checked first.
fn check_validity(promo: &PromoCode, now: DateTime<Utc>) -> Result<(), AppError> {
    if let Some(until) = promo.valid_until {
        if now > until {
            return Err(AppError::PromoExpired);
        }
    }
    if let Some(from) = promo.valid_from {
        if now < from {
            return Err(AppError::PromoNotYetValid);
        }
    }
    Ok(())
}

/// Computes the discount over the applicable items. Percent discounts are
/// rounded per item to two decimal places, half away from zero, then
/// summed. Fixed discounts apply the flat amount exactly once, capped at
/// the first applicable item's line total; later items still carry the
/// promo reference but contribute no further discount.
fn compute_discount(promo: &PromoCode, applicable: &[OrderItem]) -> Decimal {
    match promo.discount_type {
        DiscountType::Percent => applicable
            .iter()
            .map(|item| {
                (item.line_total() * promo.discount_value / Decimal::from(100))
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            })
            .sum(),
        DiscountType::Fixed => match applicable.first() {
            Some(first) => promo.discount_value.min(first.line_total()),
            None => Decimal::ZERO,
        },
    }
}

pub async fn create_promo_code(pool: &PgPool, promo: NewPromoCode) -> Result<PromoCode, AppError> {
    if repositories::promo_codes::find_by_code(pool, &promo.code)
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(format!("Promo code '{}'", promo.code)));
    }
    Ok(repositories::promo_codes::create(pool, promo).await?)
}

pub async fn get_promo_code(pool: &PgPool, id: Uuid) -> Result<PromoCode, AppError> {
    repositories::promo_codes::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promo code {id}")))
}

pub async fn list_promo_codes(pool: &PgPool) -> Result<Vec<PromoCode>, AppError> {
    Ok(repositories::promo_codes::find_all(pool).await?)
}

pub async fn list_for_event(pool: &PgPool, event_id: Uuid) -> Result<Vec<PromoCode>, AppError> {
    Ok(repositories::promo_codes::find_by_event(pool, event_id).await?)
}

pub async fn delete_promo_code(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let deleted = repositories::promo_codes::delete(pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Promo code {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(discount_type: DiscountType, value: Decimal) -> PromoCode {
        PromoCode {
            id: Uuid::new_v4(),
            code: "SAVE".to_string(),
            event_id: None,
            discount_type,
            discount_value: value,
            max_uses: None,
            used_count: 0,
            valid_from: None,
            valid_until: None,
        }
    }

    fn item(unit_price: Decimal, quantity: i32) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            ticket_category_id: Uuid::new_v4(),
            quantity,
            unit_price,
            promo_code_id: None,
        }
    }

    #[test]
    fn percent_discount_sums_per_item() {
        let promo = promo(DiscountType::Percent, Decimal::from(10));
        let items = [item(Decimal::from(1000), 1), item(Decimal::from(2000), 1)];
        assert_eq!(compute_discount(&promo, &items), Decimal::from(300));
    }

    #[test]
    fn percent_discount_rounds_each_item_half_away_from_zero() {
        // 10% of 10.05 is 1.005, rounds to 1.01 per item.
        let promo = promo(DiscountType::Percent, Decimal::from(10));
        let items = [
            item(Decimal::new(1005, 2), 1),
            item(Decimal::new(1005, 2), 1),
        ];
        assert_eq!(compute_discount(&promo, &items), Decimal::new(202, 2));
    }

    #[test]
    fn fixed_discount_applies_once() {
        let promo = promo(DiscountType::Fixed, Decimal::from(500));
        let items = [item(Decimal::from(1000), 1), item(Decimal::from(2000), 1)];
        assert_eq!(compute_discount(&promo, &items), Decimal::from(500));
    }

    #[test]
    fn fixed_discount_is_capped_at_the_first_item_line_total() {
        // The flat amount never exceeds the first applicable item's line
        // total, even when later items could absorb the rest.
        let promo = promo(DiscountType::Fixed, Decimal::from(5000));
        let items = [item(Decimal::from(300), 2), item(Decimal::from(9000), 1)];
        assert_eq!(compute_discount(&promo, &items), Decimal::from(600));
    }

    #[test]
    fn quantity_scales_the_percent_base() {
        let promo = promo(DiscountType::Percent, Decimal::from(10));
        let items = [item(Decimal::from(1000), 3)];
        assert_eq!(compute_discount(&promo, &items), Decimal::from(300));
    }

    #[test]
    fn validity_window_is_enforced() {
        let now = Utc::now();

        let mut expired = promo(DiscountType::Fixed, Decimal::ONE);
        expired.valid_until = Some(now - Duration::hours(1));
        assert!(matches!(
            check_validity(&expired, now),
            Err(AppError::PromoExpired)
        ));

        let mut early = promo(DiscountType::Fixed, Decimal::ONE);
        early.valid_from = Some(now + Duration::hours(1));
        assert!(matches!(
            check_validity(&early, now),
            Err(AppError::PromoNotYetValid)
        ));

        let mut open = promo(DiscountType::Fixed, Decimal::ONE);
        open.valid_from = Some(now - Duration::hours(1));
        open.valid_until = Some(now + Duration::hours(1));
        assert!(check_validity(&open, now).is_ok());
    }

    #[test]
    fn expiry_wins_when_both_bounds_are_violated() {
        let now = Utc::now();
        let mut weird = promo(DiscountType::Fixed, Decimal::ONE);
        weird.valid_from = Some(now + Duration::hours(2));
        weird.valid_until = Some(now - Duration::hours(2));
        assert!(matches!(
            check_validity(&weird, now),
            Err(AppError::PromoExpired)
        ));
    }
}
