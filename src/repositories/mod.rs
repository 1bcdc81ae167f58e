//! Data access layer. Every function takes an `impl PgExecutor<'_>` so the
//! same query runs against the pool or inside an open transaction.

pub mod event_tags;
pub mod events;
pub mod order_items;
pub mod orders;
pub mod organizers;
pub mod payments;
pub mod promo_codes;
pub mod statistics;
pub mod ticket_categories;
pub mod tickets;
pub mod users;
pub mod venues;
