use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{
    EventSalesView, OrganizerPerformanceView, PromoCodeEffectivenessView, VenueUtilizationView,
};

pub async fn event_sales(conn: impl PgExecutor<'_>) -> sqlx::Result<Vec<EventSalesView>> {
    sqlx::query_as::<_, EventSalesView>(
        "SELECT * FROM event_sales_view ORDER BY event_id, category_id",
    )
    .fetch_all(conn)
    .await
}

pub async fn event_sales_by_event(
    conn: impl PgExecutor<'_>,
    event_id: Uuid,
) -> sqlx::Result<Vec<EventSalesView>> {
    sqlx::query_as::<_, EventSalesView>(
        "SELECT * FROM event_sales_view WHERE event_id = $1 ORDER BY category_id",
    )
    .bind(event_id)
    .fetch_all(conn)
    .await
}

pub async fn organizer_performance(
    conn: impl PgExecutor<'_>,
) -> sqlx::Result<Vec<OrganizerPerformanceView>> {
    sqlx::query_as::<_, OrganizerPerformanceView>(
        "SELECT * FROM organizer_performance_view ORDER BY total_revenue DESC",
    )
    .fetch_all(conn)
    .await
}

pub async fn organizer_performance_by_id(
    conn: impl PgExecutor<'_>,
    organizer_id: Uuid,
) -> sqlx::Result<Option<OrganizerPerformanceView>> {
    sqlx::query_as::<_, OrganizerPerformanceView>(
        "SELECT * FROM organizer_performance_view WHERE organizer_id = $1",
    )
    .bind(organizer_id)
    .fetch_optional(conn)
    .await
}

pub async fn venue_utilization(
    conn: impl PgExecutor<'_>,
) -> sqlx::Result<Vec<VenueUtilizationView>> {
    sqlx::query_as::<_, VenueUtilizationView>(
        "SELECT * FROM venue_utilization_view ORDER BY total_revenue DESC",
    )
    .fetch_all(conn)
    .await
}

pub async fn venue_utilization_by_id(
    conn: impl PgExecutor<'_>,
    venue_id: Uuid,
) -> sqlx::Result<Option<VenueUtilizationView>> {
    sqlx::query_as::<_, VenueUtilizationView>(
        "SELECT * FROM venue_utilization_view WHERE venue_id = $1",
    )
    .bind(venue_id)
    .fetch_optional(conn)
    .await
}

pub async fn promo_code_effectiveness(
    conn: impl PgExecutor<'_>,
) -> sqlx::Result<Vec<PromoCodeEffectivenessView>> {
    sqlx::query_as::<_, PromoCodeEffectivenessView>(
        "SELECT * FROM promo_code_effectiveness_view ORDER BY orders_with_promo DESC",
    )
    .fetch_all(conn)
    .await
}

pub async fn promo_code_effectiveness_by_id(
    conn: impl PgExecutor<'_>,
    promo_code_id: Uuid,
) -> sqlx::Result<Option<PromoCodeEffectivenessView>> {
    sqlx::query_as::<_, PromoCodeEffectivenessView>(
        "SELECT * FROM promo_code_effectiveness_view WHERE promo_code_id = $1",
    )
    .bind(promo_code_id)
    .fetch_optional(conn)
    .await
}
