//! Event lifecycle. Cancelling an event cascades into the order pipeline:
//! every pending order for the event is cancelled through the same path a
//! user-initiated cancellation takes, one transaction per order.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Event, EventStatus, OrderStatus};
use crate::repositories;
use crate::repositories::events::NewEvent;
use crate::services::orders;
use crate::utils::error::AppError;

pub async fn create_event(pool: &PgPool, mut event: NewEvent) -> Result<Event, AppError> {
    repositories::organizers::find_by_id(pool, event.organizer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organizer {}", event.organizer_id)))?;

    if let Some(venue_id) = event.venue_id {
        repositories::venues::find_by_id(pool, venue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {venue_id}")))?;
    }

    // Events always start unlisted; publishing is a separate step.
    event.event_status = EventStatus::Draft;
    Ok(repositories::events::create(pool, event).await?)
}

pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Event, AppError> {
    repositories::events::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {id}")))
}

pub async fn list_events(pool: &PgPool, status: Option<EventStatus>) -> Result<Vec<Event>, AppError> {
    let events = match status {
        Some(status) => repositories::events::find_by_status(pool, status).await?,
        None => repositories::events::find_all(pool).await?,
    };
    Ok(events)
}

pub async fn list_by_organizer(pool: &PgPool, organizer_id: Uuid) -> Result<Vec<Event>, AppError> {
    Ok(repositories::events::find_by_organizer(pool, organizer_id).await?)
}

/// Updates event details. Once confirmed orders exist, the date and venue
/// are frozen; attendees bought tickets for that time and place.
pub async fn update_event(pool: &PgPool, id: Uuid, update: NewEvent) -> Result<Event, AppError> {
    let existing = get_event(pool, id).await?;

    let confirmed = repositories::events::count_confirmed_orders(pool, id).await?;
    if confirmed > 0
        && (update.start_datetime != existing.start_datetime || update.venue_id != existing.venue_id)
    {
        return Err(AppError::InvalidState(
            "Cannot change the date or venue of an event with confirmed orders".to_string(),
        ));
    }

    repositories::events::update(pool, id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {id}")))
}

pub async fn publish_event(pool: &PgPool, id: Uuid) -> Result<Event, AppError> {
    let event = get_event(pool, id).await?;
    if event.event_status == EventStatus::Cancelled {
        return Err(AppError::InvalidState(
            "Cannot publish a cancelled event".to_string(),
        ));
    }
    repositories::events::update_status(pool, id, EventStatus::Published).await?;
    get_event(pool, id).await
}

/// Cancels an event. Refusing when confirmed orders exist keeps the system
/// out of the refund business; pending orders are cancelled through the
/// order pipeline so their inventory and promo reversals happen normally.
pub async fn cancel_event(pool: &PgPool, id: Uuid) -> Result<Event, AppError> {
    let event = get_event(pool, id).await?;
    if event.event_status == EventStatus::Cancelled {
        return Err(AppError::InvalidState(
            "Event is already cancelled".to_string(),
        ));
    }

    let confirmed = repositories::events::count_confirmed_orders(pool, id).await?;
    if confirmed > 0 {
        return Err(AppError::InvalidState(
            "Cannot cancel an event with confirmed orders".to_string(),
        ));
    }

    let pending =
        repositories::orders::find_by_event_and_status(pool, id, OrderStatus::Pending).await?;
    for order in pending {
        orders::cancel_order(pool, order.id).await?;
    }

    repositories::events::update_status(pool, id, EventStatus::Cancelled).await?;
    get_event(pool, id).await
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    get_event(pool, id).await?;

    let order_count = repositories::events::count_orders(pool, id).await?;
    if order_count > 0 {
        return Err(AppError::InvalidState(
            "Cannot delete an event that has orders".to_string(),
        ));
    }

    let deleted = repositories::events::delete(pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Event {id}")));
    }
    Ok(())
}
