use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Ticket, TicketStatus};
use crate::repositories;
use crate::utils::error::AppError;

/// Generates a ticket code from a millisecond timestamp plus a random
/// suffix. Codes are only probabilistically unique here; the UNIQUE
/// constraint on `tickets.ticket_code` is what actually enforces it.
pub fn generate_ticket_code() -> String {
    format!("TKT-{}-{}", Utc::now().timestamp_millis(), random_suffix())
}

fn random_suffix() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    simple[..8].to_uppercase()
}

/// Materializes `quantity` active tickets for one order item. Must be
/// called inside the confirm-payment transaction so that either all
/// tickets for all items exist or none of the state changed.
pub async fn issue(
    conn: &mut PgConnection,
    order_item_id: Uuid,
    quantity: i32,
) -> Result<Vec<Ticket>, AppError> {
    let mut tickets = Vec::with_capacity(quantity as usize);
    for _ in 0..quantity {
        let ticket =
            repositories::tickets::create(&mut *conn, &generate_ticket_code(), order_item_id)
                .await?;
        tickets.push(ticket);
    }
    Ok(tickets)
}

pub async fn get_by_code(pool: &PgPool, code: &str) -> Result<Ticket, AppError> {
    repositories::tickets::find_by_code(pool, code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket with code '{code}'")))
}

pub async fn check_in(pool: &PgPool, ticket_id: Uuid) -> Result<Ticket, AppError> {
    let ticket = repositories::tickets::find_by_id(pool, ticket_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {ticket_id}")))?;

    if ticket.status != TicketStatus::Active {
        return Err(AppError::InvalidState(format!(
            "Only active tickets can be checked in, ticket is {}",
            ticket.status.as_str()
        )));
    }

    repositories::tickets::update_status(pool, ticket_id, TicketStatus::CheckedIn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {ticket_id}")))
}

pub async fn assign_attendee(
    pool: &PgPool,
    ticket_id: Uuid,
    attendee_name: &str,
    attendee_email: Option<&str>,
) -> Result<Ticket, AppError> {
    let ticket = repositories::tickets::find_by_id(pool, ticket_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {ticket_id}")))?;

    if ticket.status == TicketStatus::Cancelled {
        return Err(AppError::InvalidState(
            "Cannot assign an attendee to a cancelled ticket".to_string(),
        ));
    }

    repositories::tickets::set_attendee(pool, ticket_id, attendee_name, attendee_email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {ticket_id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_code_has_expected_shape() {
        let code = generate_ticket_code();
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TKT");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn consecutive_codes_differ() {
        let codes: Vec<String> = (0..100).map(|_| generate_ticket_code()).collect();
        let mut deduped = codes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), codes.len());
    }
}
