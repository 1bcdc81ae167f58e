pub mod event;
pub mod event_tag;
pub mod order;
pub mod organizer;
pub mod payment;
pub mod promo_code;
pub mod statistics;
pub mod ticket;
pub mod ticket_category;
pub mod user;
pub mod venue;

pub use event::{Event, EventStatus};
pub use event_tag::EventTag;
pub use order::{Order, OrderItem, OrderStatus};
pub use organizer::Organizer;
pub use payment::{Payment, PaymentStatus};
pub use promo_code::{DiscountType, PromoCode};
pub use statistics::{
    EventSalesView, OrganizerPerformanceView, PromoCodeEffectivenessView, VenueUtilizationView,
};
pub use ticket::{Ticket, TicketStatus};
pub use ticket_category::TicketCategory;
pub use user::User;
pub use venue::Venue;
