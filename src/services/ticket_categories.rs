//! Ticket-category management. The quantity on a category is the inventory
//! ledger the order pipeline draws from; this module only covers CRUD and
//! admission rules around it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{EventStatus, TicketCategory};
use crate::repositories;
use crate::repositories::ticket_categories::NewTicketCategory;
use crate::utils::error::AppError;

pub async fn list_for_event(pool: &PgPool, event_id: Uuid) -> Result<Vec<TicketCategory>, AppError> {
    repositories::events::find_by_id(pool, event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))?;
    Ok(repositories::ticket_categories::find_by_event(pool, event_id).await?)
}

pub async fn get_category(pool: &PgPool, id: Uuid) -> Result<TicketCategory, AppError> {
    repositories::ticket_categories::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket category {id}")))
}

pub async fn create_category(
    pool: &PgPool,
    event_id: Uuid,
    category: NewTicketCategory,
) -> Result<TicketCategory, AppError> {
    let event = repositories::events::find_by_id(pool, event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {event_id}")))?;

    if event.event_status == EventStatus::Cancelled {
        return Err(AppError::InvalidState(
            "Cannot add ticket categories to a cancelled event".to_string(),
        ));
    }

    validate_category(&category)?;
    Ok(repositories::ticket_categories::create(pool, event_id, category).await?)
}

pub async fn update_category(
    pool: &PgPool,
    id: Uuid,
    category: NewTicketCategory,
) -> Result<TicketCategory, AppError> {
    validate_category(&category)?;
    repositories::ticket_categories::update(pool, id, category)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket category {id}")))
}

/// Deleting a category that order items reference would orphan purchase
/// history, so it is refused once any order has drawn from it.
pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    get_category(pool, id).await?;

    let referencing_items = repositories::order_items::count_by_ticket_category(pool, id).await?;
    if referencing_items > 0 {
        return Err(AppError::InvalidState(
            "Cannot delete a ticket category that has been ordered".to_string(),
        ));
    }

    let deleted = repositories::ticket_categories::delete(pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Ticket category {id}")));
    }
    Ok(())
}

fn validate_category(category: &NewTicketCategory) -> Result<(), AppError> {
    if category.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }
    if category.price < Decimal::ZERO {
        return Err(AppError::Validation("Price must not be negative".to_string()));
    }
    if category.quantity_available < 0 {
        return Err(AppError::Validation(
            "Quantity must not be negative".to_string(),
        ));
    }
    validate_sale_window(category.sale_start_date, category.sale_end_date)
}

fn validate_sale_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(AppError::Validation(
                "Sale start date must not be after the end date".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn open_ended_sale_windows_are_fine() {
        let now = Utc::now();
        assert!(validate_sale_window(None, None).is_ok());
        assert!(validate_sale_window(Some(now), None).is_ok());
        assert!(validate_sale_window(None, Some(now)).is_ok());
    }

    #[test]
    fn inverted_sale_window_is_rejected() {
        let now = Utc::now();
        let err = validate_sale_window(Some(now), Some(now - Duration::hours(1))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn category_fields_are_validated() {
        let base = || NewTicketCategory {
            name: "General".to_string(),
            description: None,
            price: Decimal::from(25),
            quantity_available: 100,
            sale_start_date: None,
            sale_end_date: None,
        };

        assert!(validate_category(&base()).is_ok());

        let mut blank_name = base();
        blank_name.name = "  ".to_string();
        assert!(validate_category(&blank_name).is_err());

        let mut negative_price = base();
        negative_price.price = Decimal::from(-1);
        assert!(validate_category(&negative_price).is_err());

        let mut negative_stock = base();
        negative_stock.quantity_available = -5;
        assert!(validate_category(&negative_stock).is_err());
    }
}
