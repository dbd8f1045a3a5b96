use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use voyago_booking::{BookingOrchestrator, BookingRequest, DeadlineSweeper, MockGateway, PromoValidator};
use voyago_core::repository::{
    BookingRepository, ItemRepository, PromoCodeRepository, TouristRepository,
};
use voyago_domain::{BookableItem, BookingStatus, ItemKind, PromoCode, Tourist};
use voyago_store::{BookingRules, MemoryStore, PaymentRules};

fn orchestrator(store: Arc<MemoryStore>) -> BookingOrchestrator {
    BookingOrchestrator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        PromoValidator::new(store),
        Arc::new(MockGateway::new()),
        BookingRules::default(),
        PaymentRules::default(),
    )
}

#[tokio::test]
async fn wallet_booking_with_promo_flows_to_completed() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now();

    let tourist = Tourist::new(
        "farah",
        "farah@example.com",
        NaiveDate::from_ymd_opt(1994, 9, 12).unwrap(),
        500.0,
    );
    TouristRepository::create(store.as_ref(), &tourist)
        .await
        .unwrap();

    let item = BookableItem::new(
        ItemKind::Itinerary,
        "Luxor day trip",
        400.0,
        now + Duration::days(4),
        Uuid::new_v4(),
    );
    ItemRepository::create(store.as_ref(), &item).await.unwrap();

    let promo = PromoCode::new("SPRING50", 50.0, now + Duration::days(30), 10);
    PromoCodeRepository::create(store.as_ref(), &promo)
        .await
        .unwrap();

    // Book with the promo, paying from the wallet
    let confirmation = orchestrator(store.clone())
        .book(&BookingRequest {
            item_id: item.id,
            tourist_id: tourist.id,
            payment_method: Some("wallet".to_string()),
            promo_code: Some("SPRING50".to_string()),
        })
        .await
        .unwrap();
    assert!((confirmation.final_price - 200.0).abs() < 1e-9);

    // Wallet debited, promo use consumed, booking pending
    let tourist_after = TouristRepository::get_active(store.as_ref(), tourist.id)
        .await
        .unwrap()
        .unwrap();
    assert!((tourist_after.wallet - 300.0).abs() < 1e-9);

    let promo_after = store.find_by_code("SPRING50").await.unwrap().unwrap();
    assert_eq!(promo_after.usage_limit, 9);

    let pending = store
        .list_for_tourist(tourist.id, Some(BookingStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, confirmation.booking_id);

    // Once the service date has passed, the nightly sweep finalizes it
    let sweeper = DeadlineSweeper::new(store.clone());
    let report = sweeper.sweep(now + Duration::days(5)).await.unwrap();
    assert_eq!(report.total(), 1);

    let completed = store
        .list_for_tourist(tourist.id, Some(BookingStatus::Completed))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);

    // Sweeping again is a no-op
    let report = sweeper.sweep(now + Duration::days(5)).await.unwrap();
    assert_eq!(report.total(), 0);
}

#[tokio::test]
async fn card_booking_leaves_the_wallet_alone() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now();

    let tourist = Tourist::new(
        "karim",
        "karim@example.com",
        NaiveDate::from_ymd_opt(1988, 2, 2).unwrap(),
        75.0,
    );
    TouristRepository::create(store.as_ref(), &tourist)
        .await
        .unwrap();

    let item = BookableItem::new(
        ItemKind::Hotel,
        "Red Sea resort, 3 nights",
        980.0,
        now + Duration::days(12),
        Uuid::new_v4(),
    );
    ItemRepository::create(store.as_ref(), &item).await.unwrap();

    let confirmation = orchestrator(store.clone())
        .book(&BookingRequest {
            item_id: item.id,
            tourist_id: tourist.id,
            payment_method: Some("card".to_string()),
            promo_code: None,
        })
        .await
        .unwrap();
    assert!((confirmation.final_price - 980.0).abs() < 1e-9);

    let tourist_after = TouristRepository::get_active(store.as_ref(), tourist.id)
        .await
        .unwrap()
        .unwrap();
    assert!((tourist_after.wallet - 75.0).abs() < 1e-9);

    let booking = store.get(confirmation.booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.kind, ItemKind::Hotel);
    assert_eq!(booking.date, item.date);
}

#[tokio::test]
async fn retired_item_cannot_be_booked() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now();

    let tourist = Tourist::new(
        "ziad",
        "ziad@example.com",
        NaiveDate::from_ymd_opt(1999, 7, 21).unwrap(),
        200.0,
    );
    TouristRepository::create(store.as_ref(), &tourist)
        .await
        .unwrap();

    let item = BookableItem::new(
        ItemKind::Activity,
        "Flagged diving trip",
        150.0,
        now + Duration::days(2),
        Uuid::new_v4(),
    );
    ItemRepository::create(store.as_ref(), &item).await.unwrap();
    store
        .set_lifecycle(item.id, voyago_domain::Lifecycle::Retired)
        .await
        .unwrap();

    let err = orchestrator(store.clone())
        .book(&BookingRequest {
            item_id: item.id,
            tourist_id: tourist.id,
            payment_method: None,
            promo_code: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, voyago_booking::BookingError::NotFound("item")));
}
