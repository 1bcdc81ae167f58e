use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::promo_code::DiscountType;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventSalesView {
    pub event_id: Uuid,
    pub event_title: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_price: Decimal,
    pub total_sold: i32,
    pub quantity_available: i32,
    pub total_revenue: Decimal,
    pub sold_last_7_days: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrganizerPerformanceView {
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub total_events: i32,
    pub published_events: i32,
    pub cancelled_events: i32,
    pub total_tickets_sold: i32,
    pub total_revenue: Decimal,
    pub avg_ticket_price: Decimal,
    pub success_rate: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VenueUtilizationView {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub address: String,
    pub capacity: i32,
    pub total_events: i64,
    pub active_events: i64,
    pub tickets_sold: i64,
    pub total_revenue: Decimal,
    pub avg_occupancy_percentage: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PromoCodeEffectivenessView {
    pub promo_code_id: Uuid,
    pub code: String,
    pub event_id: Option<Uuid>,
    pub event_title: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub orders_with_promo: i32,
    pub total_discount_given: Decimal,
    pub avg_discount_per_order: Decimal,
}
