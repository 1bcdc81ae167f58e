use axum::routing::{get, patch, post, put};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::auth::require_authorization;
use crate::config::{create_cors_layer, security_headers};
use crate::handlers;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        // Authentication
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Users (admin)
        .route("/users", get(handlers::users::list_users))
        .route("/users/:id", get(handlers::users::get_user))
        // Organizers
        .route(
            "/organizers",
            get(handlers::organizers::list_organizers).post(handlers::organizers::create_organizer),
        )
        .route(
            "/organizers/:id",
            get(handlers::organizers::get_organizer)
                .put(handlers::organizers::update_organizer)
                .delete(handlers::organizers::delete_organizer),
        )
        // Venues
        .route(
            "/venues",
            get(handlers::venues::list_venues).post(handlers::venues::create_venue),
        )
        .route(
            "/venues/:id",
            get(handlers::venues::get_venue)
                .put(handlers::venues::update_venue)
                .delete(handlers::venues::delete_venue),
        )
        // Events
        .route(
            "/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route("/events/published", get(handlers::events::list_published_events))
        .route(
            "/events/organizer/:organizer_id",
            get(handlers::events::list_events_by_organizer),
        )
        .route(
            "/events/:id",
            get(handlers::events::get_event)
                .put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route("/events/:id/status", patch(handlers::events::update_event_status))
        .route(
            "/events/:id/ticket-categories",
            get(handlers::ticket_categories::list_for_event)
                .post(handlers::ticket_categories::create_for_event),
        )
        .route("/events/:id/tags", get(handlers::events::get_event_tags))
        .route(
            "/events/:id/tags/:tag_id",
            put(handlers::events::assign_tag).delete(handlers::events::remove_tag),
        )
        // Ticket categories
        .route(
            "/ticket-categories/:id",
            get(handlers::ticket_categories::get_category)
                .put(handlers::ticket_categories::update_category)
                .delete(handlers::ticket_categories::delete_category),
        )
        // Event tags
        .route(
            "/event-tags",
            get(handlers::event_tags::list_tags).post(handlers::event_tags::create_tag),
        )
        .route(
            "/event-tags/:id",
            get(handlers::event_tags::get_tag).delete(handlers::event_tags::delete_tag),
        )
        // Promo codes
        .route(
            "/promo-codes",
            get(handlers::promo_codes::list_promo_codes)
                .post(handlers::promo_codes::create_promo_code),
        )
        .route(
            "/promo-codes/code/:code",
            get(handlers::promo_codes::get_promo_code_by_code),
        )
        .route(
            "/promo-codes/event/:event_id",
            get(handlers::promo_codes::list_promo_codes_for_event),
        )
        .route(
            "/promo-codes/:id",
            get(handlers::promo_codes::get_promo_code)
                .delete(handlers::promo_codes::delete_promo_code),
        )
        // Orders and the transaction pipeline
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/orders/user/:user_id", get(handlers::orders::list_user_orders))
        .route("/orders/:id", get(handlers::orders::get_order))
        .route("/orders/:id/payment", post(handlers::orders::confirm_payment))
        .route("/orders/:id/cancel", patch(handlers::orders::cancel_order))
        .route(
            "/orders/:id/apply-promo",
            post(handlers::orders::apply_promo_code),
        )
        .route("/orders/:id/tickets", get(handlers::orders::get_order_tickets))
        // Tickets
        .route(
            "/tickets/code/:code",
            get(handlers::tickets::get_ticket_by_code),
        )
        .route(
            "/tickets/:id/check-in",
            patch(handlers::tickets::check_in_ticket),
        )
        .route(
            "/tickets/:id/attendee",
            patch(handlers::tickets::assign_attendee),
        )
        // Payments
        .route(
            "/payments/order/:order_id",
            get(handlers::payments::get_payment_for_order),
        )
        // Statistics
        .route(
            "/statistics/event-sales",
            get(handlers::statistics::event_sales),
        )
        .route(
            "/statistics/organizer-performance",
            get(handlers::statistics::organizer_performance),
        )
        .route(
            "/statistics/organizer-performance/:organizer_id",
            get(handlers::statistics::organizer_performance_by_id),
        )
        .route(
            "/statistics/venue-utilization",
            get(handlers::statistics::venue_utilization),
        )
        .route(
            "/statistics/venue-utilization/:venue_id",
            get(handlers::statistics::venue_utilization_by_id),
        )
        .route(
            "/statistics/promo-code-effectiveness",
            get(handlers::statistics::promo_code_effectiveness),
        )
        .route(
            "/statistics/promo-code-effectiveness/:promo_code_id",
            get(handlers::statistics::promo_code_effectiveness_by_id),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_authorization,
        ))
        .layer(middleware::from_fn(security_headers))
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
