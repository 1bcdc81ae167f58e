pub mod auth;
pub mod event_tags;
pub mod events;
pub mod orders;
pub mod organizers;
pub mod payments;
pub mod promo_codes;
pub mod statistics;
pub mod ticket_categories;
pub mod tickets;
pub mod users;
pub mod venues;

use axum::response::IntoResponse;
use serde::Serialize;

use crate::utils::response::success;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    version: &'static str,
}

pub async fn health_check() -> impl IntoResponse {
    success(
        HealthPayload {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
        "Service is healthy",
    )
}
