//! End-to-end pipeline tests against a real Postgres instance. Each test
//! gets its own database with the migrations applied, so the guarded
//! ledger updates and the serializable transactions are exercised for
//! real, not mocked.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use entrada_server::models::{
    DiscountType, EventStatus, OrderStatus, PaymentStatus, PromoCode, TicketStatus,
};
use entrada_server::repositories;
use entrada_server::repositories::events::NewEvent;
use entrada_server::repositories::organizers::NewOrganizer;
use entrada_server::repositories::promo_codes::NewPromoCode;
use entrada_server::repositories::ticket_categories::NewTicketCategory;
use entrada_server::repositories::users::NewUser;
use entrada_server::services::orders::{self, OrderItemRequest};
use entrada_server::services::{events, promo_codes, tickets};
use entrada_server::utils::error::AppError;

struct Fixture {
    user_id: Uuid,
    event_id: Uuid,
    category_id: Uuid,
}

/// One published event with a single ticket category on sale.
async fn seed(pool: &PgPool, stock: i32, price: Decimal) -> Fixture {
    let tag = Uuid::new_v4().simple().to_string();

    let user = repositories::users::create(
        pool,
        NewUser {
            username: format!("buyer-{tag}"),
            email: format!("buyer-{tag}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .unwrap();

    let organizer = repositories::organizers::create(
        pool,
        NewOrganizer {
            name: format!("Organizer {tag}"),
            description: None,
            contact_email: format!("organizer-{tag}@example.com"),
            contact_phone: None,
            user_id: None,
        },
    )
    .await
    .unwrap();

    let event = repositories::events::create(
        pool,
        NewEvent {
            title: format!("Event {tag}"),
            description: None,
            organizer_id: organizer.id,
            venue_id: None,
            start_datetime: Utc::now() + Duration::days(30),
            event_status: EventStatus::Published,
        },
    )
    .await
    .unwrap();

    let category = repositories::ticket_categories::create(
        pool,
        event.id,
        NewTicketCategory {
            name: "General".to_string(),
            description: None,
            price,
            quantity_available: stock,
            sale_start_date: None,
            sale_end_date: None,
        },
    )
    .await
    .unwrap();

    Fixture {
        user_id: user.id,
        event_id: event.id,
        category_id: category.id,
    }
}

async fn seed_promo(pool: &PgPool, promo: NewPromoCode) -> PromoCode {
    repositories::promo_codes::create(pool, promo).await.unwrap()
}

async fn available(pool: &PgPool, category_id: Uuid) -> i32 {
    repositories::ticket_categories::find_by_id(pool, category_id)
        .await
        .unwrap()
        .unwrap()
        .quantity_available
}

fn one_item(category_id: Uuid, quantity: i32) -> Vec<OrderItemRequest> {
    vec![OrderItemRequest {
        ticket_category_id: category_id,
        quantity,
    }]
}

#[sqlx::test]
async fn concurrent_orders_never_oversell(pool: PgPool) {
    let fx = seed(&pool, 5, Decimal::from(40)).await;
    let items = one_item(fx.category_id, 3);

    let (a, b) = tokio::join!(
        orders::create_order(&pool, fx.user_id, &items),
        orders::create_order(&pool, fx.user_id, &items),
    );

    // Two orders of 3 cannot both fit in a stock of 5: whichever loses the
    // race fails cleanly, either at the guarded decrement or as a
    // serialization conflict, and its reservation rolls back.
    let results = [a, b];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert!(succeeded <= 1);
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(
                err,
                AppError::InsufficientInventory(_) | AppError::SerializationConflict
            ));
        }
    }
    assert_eq!(
        available(&pool, fx.category_id).await,
        5 - 3 * succeeded as i32
    );
}

#[sqlx::test]
async fn confirming_payment_issues_one_active_ticket_per_unit(pool: PgPool) {
    let fx = seed(&pool, 10, Decimal::from(25)).await;
    let order = orders::create_order(&pool, fx.user_id, &one_item(fx.category_id, 3))
        .await
        .unwrap();

    let confirmed = orders::process_payment(&pool, order.id, "pay_abc123")
        .await
        .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);

    let issued = orders::get_order_tickets(&pool, order.id).await.unwrap();
    assert_eq!(issued.len(), 3);
    assert!(issued.iter().all(|t| t.status == TicketStatus::Active));

    let mut codes: Vec<&str> = issued.iter().map(|t| t.ticket_code.as_str()).collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 3);

    let payment = repositories::payments::find_by_order(&pool, order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Succeeded);
    assert_eq!(payment.external_payment_id.as_deref(), Some("pay_abc123"));
}

#[sqlx::test]
async fn cancelling_twice_is_rejected_without_touching_the_ledger(pool: PgPool) {
    let fx = seed(&pool, 5, Decimal::from(40)).await;
    let order = orders::create_order(&pool, fx.user_id, &one_item(fx.category_id, 2))
        .await
        .unwrap();
    assert_eq!(available(&pool, fx.category_id).await, 3);

    let cancelled = orders::cancel_order(&pool, order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(available(&pool, fx.category_id).await, 5);

    let err = orders::cancel_order(&pool, order.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    // The second attempt must not release inventory again.
    assert_eq!(available(&pool, fx.category_id).await, 5);
}

#[sqlx::test]
async fn cancellation_restores_inventory_and_promo_use(pool: PgPool) {
    let fx = seed(&pool, 5, Decimal::from(100)).await;
    let promo = seed_promo(
        &pool,
        NewPromoCode {
            code: "TENOFF".to_string(),
            event_id: None,
            discount_type: DiscountType::Fixed,
            discount_value: Decimal::from(10),
            max_uses: Some(5),
            valid_from: None,
            valid_until: None,
        },
    )
    .await;

    let order = orders::create_order(&pool, fx.user_id, &one_item(fx.category_id, 2))
        .await
        .unwrap();
    assert_eq!(order.total_amount, Decimal::from(200));

    let discounted = promo_codes::apply_promo_code(&pool, order.id, "TENOFF")
        .await
        .unwrap();
    assert_eq!(discounted.total_amount, Decimal::from(190));
    let used = promo_codes::get_promo_code(&pool, promo.id).await.unwrap();
    assert_eq!(used.used_count, 1);

    orders::cancel_order(&pool, order.id).await.unwrap();

    assert_eq!(available(&pool, fx.category_id).await, 5);
    let released = promo_codes::get_promo_code(&pool, promo.id).await.unwrap();
    assert_eq!(released.used_count, 0);

    let payment = repositories::payments::find_by_order(&pool, order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
}

#[sqlx::test]
async fn checked_in_tickets_block_cancellation(pool: PgPool) {
    let fx = seed(&pool, 5, Decimal::from(40)).await;
    let order = orders::create_order(&pool, fx.user_id, &one_item(fx.category_id, 2))
        .await
        .unwrap();
    orders::process_payment(&pool, order.id, "pay_checkin")
        .await
        .unwrap();

    let issued = orders::get_order_tickets(&pool, order.id).await.unwrap();
    tickets::check_in(&pool, issued[0].id).await.unwrap();

    let err = orders::cancel_order(&pool, order.id).await.unwrap_err();
    assert!(matches!(err, AppError::HasCheckedInTickets));

    // Nothing rolled forward: the order stays confirmed, the attended
    // ticket stays checked in, inventory stays reserved.
    let order = orders::get_order(&pool, order.id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    let ticket = tickets::get_by_code(&pool, &issued[0].ticket_code)
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::CheckedIn);
    assert_eq!(available(&pool, fx.category_id).await, 3);
}

#[sqlx::test]
async fn expired_promo_leaves_order_and_ledger_untouched(pool: PgPool) {
    let fx = seed(&pool, 5, Decimal::from(100)).await;
    let promo = seed_promo(
        &pool,
        NewPromoCode {
            code: "LASTYEAR".to_string(),
            event_id: None,
            discount_type: DiscountType::Percent,
            discount_value: Decimal::from(10),
            max_uses: Some(5),
            valid_from: None,
            valid_until: Some(Utc::now() - Duration::hours(1)),
        },
    )
    .await;

    let order = orders::create_order(&pool, fx.user_id, &one_item(fx.category_id, 1))
        .await
        .unwrap();

    let err = promo_codes::apply_promo_code(&pool, order.id, "LASTYEAR")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PromoExpired));

    let untouched = promo_codes::get_promo_code(&pool, promo.id).await.unwrap();
    assert_eq!(untouched.used_count, 0);
    let order = orders::get_order(&pool, order.id).await.unwrap();
    assert_eq!(order.total_amount, Decimal::from(100));
    let items = repositories::order_items::find_by_order(&pool, order.id)
        .await
        .unwrap();
    assert!(items.iter().all(|item| item.promo_code_id.is_none()));
}

#[sqlx::test]
async fn events_with_orders_cannot_be_deleted(pool: PgPool) {
    let fx = seed(&pool, 5, Decimal::from(40)).await;
    orders::create_order(&pool, fx.user_id, &one_item(fx.category_id, 1))
        .await
        .unwrap();

    let err = events::delete_event(&pool, fx.event_id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert!(events::get_event(&pool, fx.event_id).await.is_ok());

    // An event nobody ordered from deletes fine.
    let other = seed(&pool, 5, Decimal::from(40)).await;
    events::delete_event(&pool, other.event_id).await.unwrap();
    let err = events::get_event(&pool, other.event_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
