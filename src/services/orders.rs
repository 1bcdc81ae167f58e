//! Order transaction pipeline: create, confirm payment, cancel. Each
//! operation runs in one serializable transaction; the guarded ledger
//! updates remain the correctness backstop if isolation is ever weakened.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Order, OrderStatus, PaymentStatus, Ticket, TicketCategory, TicketStatus};
use crate::repositories;
use crate::services::{begin_serializable, tickets};
use crate::utils::error::AppError;

/// Per-order policy cap on units of a single category.
pub const MAX_TICKETS_PER_ORDER: i32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub ticket_category_id: Uuid,
    pub quantity: i32,
}

/// Creates an order against finite inventory. Reservations happen through
/// the guarded decrement inside the same transaction as the reads, so a
/// race lost to a concurrent buyer rolls everything back atomically.
pub async fn create_order(
    pool: &PgPool,
    user_id: Uuid,
    items: &[OrderItemRequest],
) -> Result<Order, AppError> {
    if items.is_empty() {
        return Err(AppError::Validation(
            "Order must contain at least one item".to_string(),
        ));
    }

    let mut tx = begin_serializable(pool).await?;

    repositories::users::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id}")))?;

    let now = Utc::now();
    let mut total_amount = Decimal::ZERO;
    let mut validated: Vec<(Uuid, i32, Decimal)> = Vec::with_capacity(items.len());

    for item in items {
        let category = repositories::ticket_categories::find_by_id(&mut *tx, item.ticket_category_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Ticket category {}", item.ticket_category_id))
            })?;

        validate_purchase(&category, item.quantity, now)?;

        // Guarded decrement: re-checks stock at write time even though the
        // read above already looked sufficient.
        let reserved =
            repositories::ticket_categories::reserve(&mut *tx, category.id, item.quantity).await?;
        if reserved == 0 {
            return Err(AppError::InsufficientInventory(category.name));
        }

        total_amount += category.price * Decimal::from(item.quantity);
        validated.push((category.id, item.quantity, category.price));
    }

    let order =
        repositories::orders::create(&mut *tx, &generate_order_number(), user_id, total_amount)
            .await?;

    for (category_id, quantity, unit_price) in validated {
        repositories::order_items::create(&mut *tx, order.id, category_id, quantity, unit_price)
            .await?;
    }

    repositories::payments::create(&mut *tx, order.id, total_amount).await?;

    tx.commit().await?;

    tracing::info!(order_id = %order.id, order_number = %order.order_number, "Order created");
    Ok(order)
}

/// Confirms payment and materializes tickets. The payment update, the
/// status transition and the ticket issuance commit together or not at all.
pub async fn process_payment(
    pool: &PgPool,
    order_id: Uuid,
    external_payment_id: &str,
) -> Result<Order, AppError> {
    let mut tx = begin_serializable(pool).await?;

    let order = repositories::orders::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;

    if order.status != OrderStatus::Pending {
        return Err(AppError::InvalidState(format!(
            "Order is not pending, current status: {}",
            order.status.as_str()
        )));
    }

    let payment = repositories::payments::find_by_order(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment for order {order_id}")))?;

    repositories::payments::mark_succeeded(&mut *tx, payment.id, external_payment_id, Utc::now())
        .await?;

    let order = repositories::orders::update_status(&mut *tx, order_id, OrderStatus::Confirmed)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;

    let order_items = repositories::order_items::find_by_order(&mut *tx, order_id).await?;
    for item in &order_items {
        tickets::issue(&mut tx, item.id, item.quantity).await?;
    }

    tx.commit().await?;

    tracing::info!(order_id = %order_id, "Payment confirmed, tickets issued");
    Ok(order)
}

/// Cancels an order and reverses its side effects: inventory back to the
/// ledger, one promo use back per applied code, tickets cancelled, payment
/// failed if still pending. A confirmed order with checked-in tickets
/// cannot be cancelled.
pub async fn cancel_order(pool: &PgPool, order_id: Uuid) -> Result<Order, AppError> {
    let mut tx = begin_serializable(pool).await?;

    let order = repositories::orders::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;

    if order.status == OrderStatus::Cancelled {
        return Err(AppError::InvalidState(
            "Order is already cancelled".to_string(),
        ));
    }

    let was_confirmed = order.status == OrderStatus::Confirmed;

    let order_tickets = repositories::tickets::find_by_order(&mut *tx, order_id).await?;
    if was_confirmed
        && order_tickets
            .iter()
            .any(|t| t.status == TicketStatus::CheckedIn)
    {
        return Err(AppError::HasCheckedInTickets);
    }

    let order_items = repositories::order_items::find_by_order(&mut *tx, order_id).await?;

    for item in &order_items {
        let released =
            repositories::ticket_categories::release(&mut *tx, item.ticket_category_id, item.quantity)
                .await?;
        if released == 0 {
            return Err(AppError::NotFound(format!(
                "Ticket category {}",
                item.ticket_category_id
            )));
        }
    }

    // One promo use was consumed per applied code, regardless of how many
    // items carry the reference, so release exactly one per distinct code.
    let promo_ids: BTreeSet<Uuid> = order_items
        .iter()
        .filter_map(|item| item.promo_code_id)
        .collect();
    for promo_id in promo_ids {
        repositories::promo_codes::release_use(&mut *tx, promo_id).await?;
    }

    if was_confirmed && !order_tickets.is_empty() {
        let ticket_ids: Vec<Uuid> = order_tickets.iter().map(|t| t.id).collect();
        repositories::tickets::batch_update_status(&mut *tx, &ticket_ids, TicketStatus::Cancelled)
            .await?;
    }

    let order = repositories::orders::update_status(&mut *tx, order_id, OrderStatus::Cancelled)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;

    if let Some(payment) = repositories::payments::find_by_order(&mut *tx, order_id).await? {
        if payment.status == PaymentStatus::Pending {
            repositories::payments::update_status(&mut *tx, payment.id, PaymentStatus::Failed)
                .await?;
        }
    }

    tx.commit().await?;

    tracing::info!(order_id = %order_id, "Order cancelled");
    Ok(order)
}

pub async fn get_order(pool: &PgPool, order_id: Uuid) -> Result<Order, AppError> {
    repositories::orders::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))
}

pub async fn list_orders(pool: &PgPool, status: Option<OrderStatus>) -> Result<Vec<Order>, AppError> {
    let orders = match status {
        Some(status) => repositories::orders::find_by_status(pool, status).await?,
        None => repositories::orders::find_all(pool).await?,
    };
    Ok(orders)
}

pub async fn list_user_orders(pool: &PgPool, user_id: Uuid) -> Result<Vec<Order>, AppError> {
    Ok(repositories::orders::find_by_user(pool, user_id).await?)
}

pub async fn get_order_tickets(pool: &PgPool, order_id: Uuid) -> Result<Vec<Ticket>, AppError> {
    repositories::orders::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;
    Ok(repositories::tickets::find_by_order(pool, order_id).await?)
}

fn generate_order_number() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!(
        "ORD-{}-{}",
        Utc::now().timestamp_millis(),
        simple[..8].to_uppercase()
    )
}

/// Pure admission checks for one order line. Inventory is re-checked by
/// the guarded decrement afterwards; this pre-check only produces a
/// friendlier error for the common case.
fn validate_purchase(
    category: &TicketCategory,
    quantity: i32,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::Validation("Quantity must be positive".to_string()));
    }

    if quantity > MAX_TICKETS_PER_ORDER {
        return Err(AppError::Validation(format!(
            "Cannot purchase more than {MAX_TICKETS_PER_ORDER} tickets per order"
        )));
    }

    if category.quantity_available < quantity {
        return Err(AppError::InsufficientInventory(category.name.clone()));
    }

    if let Some(start) = category.sale_start_date {
        if now < start {
            return Err(AppError::Validation(
                "Ticket sales have not started yet".to_string(),
            ));
        }
    }

    if let Some(end) = category.sale_end_date {
        if now > end {
            return Err(AppError::Validation("Ticket sales have ended".to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn category(available: i32) -> TicketCategory {
        TicketCategory {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "General".to_string(),
            description: None,
            price: Decimal::new(2500, 2),
            quantity_available: available,
            sale_start_date: None,
            sale_end_date: None,
        }
    }

    #[test]
    fn accepts_a_plain_purchase() {
        assert!(validate_purchase(&category(100), 4, Utc::now()).is_ok());
    }

    #[test]
    fn rejects_non_positive_quantity() {
        for qty in [0, -3] {
            let err = validate_purchase(&category(100), qty, Utc::now()).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn rejects_quantity_above_per_order_cap() {
        let err =
            validate_purchase(&category(100), MAX_TICKETS_PER_ORDER + 1, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // The cap itself is allowed.
        assert!(validate_purchase(&category(100), MAX_TICKETS_PER_ORDER, Utc::now()).is_ok());
    }

    #[test]
    fn rejects_when_stock_is_short() {
        let err = validate_purchase(&category(3), 4, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::InsufficientInventory(_)));
    }

    #[test]
    fn enforces_the_sale_window_when_present() {
        let now = Utc::now();

        let mut not_started = category(100);
        not_started.sale_start_date = Some(now + Duration::hours(1));
        assert!(matches!(
            validate_purchase(&not_started, 1, now),
            Err(AppError::Validation(_))
        ));

        let mut ended = category(100);
        ended.sale_end_date = Some(now - Duration::hours(1));
        assert!(matches!(
            validate_purchase(&ended, 1, now),
            Err(AppError::Validation(_))
        ));

        let mut open = category(100);
        open.sale_start_date = Some(now - Duration::hours(1));
        open.sale_end_date = Some(now + Duration::hours(1));
        assert!(validate_purchase(&open, 1, now).is_ok());
    }

    #[test]
    fn order_numbers_are_prefixed_and_distinct() {
        let a = generate_order_number();
        let b = generate_order_number();
        assert!(a.starts_with("ORD-"));
        assert_ne!(a, b);
    }
}
