use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use voyago_core::repository::{
    BookingRepository, ItemRepository, PromoCodeRepository, TouristRepository,
};
use voyago_domain::{
    BookableItem, Booking, BookingStatus, ItemKind, Lifecycle, PromoCode, Tourist,
};

/// In-memory document store implementing every repository trait.
///
/// This is the in-tree stand-in for the external datastore: equality
/// and date-range filters, active-lifecycle filters, per-document
/// conditional updates and bulk update-many, with each mutation atomic
/// under the collection's write lock. Production deployments swap in a
/// driver-backed implementation of the same traits.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<Uuid, BookableItem>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    promo_codes: RwLock<HashMap<String, PromoCode>>,
    tourists: RwLock<HashMap<Uuid, Tourist>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn list_active(
        &self,
    ) -> Result<Vec<BookableItem>, Box<dyn std::error::Error + Send + Sync>> {
        let items = self.items.read().await;
        let mut found: Vec<BookableItem> = items
            .values()
            .filter(|i| i.lifecycle.is_active())
            .cloned()
            .collect();
        found.sort_by_key(|i| i.date);
        Ok(found)
    }

    async fn list_upcoming(
        &self,
        from: DateTime<Utc>,
    ) -> Result<Vec<BookableItem>, Box<dyn std::error::Error + Send + Sync>> {
        let items = self.items.read().await;
        let mut found: Vec<BookableItem> = items
            .values()
            .filter(|i| i.lifecycle.is_active() && i.date >= from)
            .cloned()
            .collect();
        found.sort_by_key(|i| i.date);
        Ok(found)
    }

    async fn get_active(
        &self,
        id: Uuid,
    ) -> Result<Option<BookableItem>, Box<dyn std::error::Error + Send + Sync>> {
        let items = self.items.read().await;
        Ok(items
            .get(&id)
            .filter(|i| i.lifecycle.is_active())
            .cloned())
    }

    async fn create(
        &self,
        item: &BookableItem,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut items = self.items.write().await;
        items.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(
        &self,
        item: &BookableItem,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut items = self.items.write().await;
        match items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_lifecycle(
        &self,
        id: Uuid,
        lifecycle: Lifecycle,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut items = self.items.write().await;
        match items.get_mut(&id) {
            Some(item) => {
                item.lifecycle = lifecycle;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .get(&id)
            .filter(|b| b.lifecycle.is_active())
            .cloned())
    }

    async fn find_pending(
        &self,
        tourist_id: Uuid,
        item_id: Uuid,
        service_day: NaiveDate,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .find(|b| {
                b.lifecycle.is_active()
                    && b.status == BookingStatus::Pending
                    && b.tourist_id == tourist_id
                    && b.item_id == item_id
                    && b.service_day() == service_day
            })
            .cloned())
    }

    async fn list_for_tourist(
        &self,
        tourist_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let bookings = self.bookings.read().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| {
                b.lifecycle.is_active()
                    && b.tourist_id == tourist_id
                    && status.map_or(true, |s| b.status == s)
            })
            .cloned()
            .collect();
        found.sort_by_key(|b| b.created_at);
        Ok(found)
    }

    async fn list_pending(
        &self,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let bookings = self.bookings.read().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.lifecycle.is_active() && b.status == BookingStatus::Pending)
            .cloned()
            .collect();
        found.sort_by_key(|b| b.date);
        Ok(found)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings.get_mut(&id).ok_or("booking not found")?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(())
    }

    async fn complete_past_due(
        &self,
        kind: ItemKind,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let mut bookings = self.bookings.write().await;
        let now = Utc::now();
        let mut updated = 0;
        for booking in bookings.values_mut() {
            if booking.kind == kind
                && booking.lifecycle.is_active()
                && booking.status == BookingStatus::Pending
                && booking.date < cutoff
            {
                booking.status = BookingStatus::Completed;
                booking.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[async_trait]
impl PromoCodeRepository for MemoryStore {
    async fn create(
        &self,
        promo: &PromoCode,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut promo_codes = self.promo_codes.write().await;
        promo_codes.insert(promo.code.clone(), promo.clone());
        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<PromoCode>, Box<dyn std::error::Error + Send + Sync>> {
        let promo_codes = self.promo_codes.read().await;
        Ok(promo_codes
            .get(code)
            .filter(|p| p.lifecycle.is_active())
            .cloned())
    }

    async fn adjust_usage(
        &self,
        code: &str,
        delta: i64,
    ) -> Result<Option<i64>, Box<dyn std::error::Error + Send + Sync>> {
        let mut promo_codes = self.promo_codes.write().await;
        let Some(promo) = promo_codes.get_mut(code).filter(|p| p.lifecycle.is_active()) else {
            return Ok(None);
        };
        let next = promo.usage_limit + delta;
        if next < 0 {
            return Ok(None);
        }
        promo.usage_limit = next;
        Ok(Some(next))
    }
}

#[async_trait]
impl TouristRepository for MemoryStore {
    async fn create(
        &self,
        tourist: &Tourist,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut tourists = self.tourists.write().await;
        tourists.insert(tourist.id, tourist.clone());
        Ok(())
    }

    async fn get_active(
        &self,
        id: Uuid,
    ) -> Result<Option<Tourist>, Box<dyn std::error::Error + Send + Sync>> {
        let tourists = self.tourists.read().await;
        Ok(tourists
            .get(&id)
            .filter(|t| t.lifecycle.is_active())
            .cloned())
    }

    async fn debit_wallet(
        &self,
        id: Uuid,
        amount: f64,
    ) -> Result<Option<f64>, Box<dyn std::error::Error + Send + Sync>> {
        let mut tourists = self.tourists.write().await;
        let tourist = tourists.get_mut(&id).ok_or("tourist not found")?;
        if tourist.wallet < amount {
            return Ok(None);
        }
        tourist.wallet -= amount;
        Ok(Some(tourist.wallet))
    }

    async fn credit_wallet(
        &self,
        id: Uuid,
        amount: f64,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        let mut tourists = self.tourists.write().await;
        let tourist = tourists.get_mut(&id).ok_or("tourist not found")?;
        tourist.wallet += amount;
        Ok(tourist.wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use voyago_domain::PaymentMethod;

    fn item(kind: ItemKind, date: DateTime<Utc>) -> BookableItem {
        BookableItem::new(kind, "test item", 100.0, date, Uuid::new_v4())
    }

    #[tokio::test]
    async fn retired_items_disappear_from_active_queries() {
        let store = MemoryStore::new();
        let i = item(ItemKind::Activity, Utc::now() + Duration::days(3));
        ItemRepository::create(&store, &i).await.unwrap();

        assert!(ItemRepository::get_active(&store, i.id).await.unwrap().is_some());
        assert!(store.set_lifecycle(i.id, Lifecycle::Retired).await.unwrap());
        assert!(ItemRepository::get_active(&store, i.id).await.unwrap().is_none());
        assert!(store.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upcoming_filter_excludes_past_items() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let past = item(ItemKind::Activity, now - Duration::days(1));
        let future = item(ItemKind::Activity, now + Duration::days(1));
        ItemRepository::create(&store, &past).await.unwrap();
        ItemRepository::create(&store, &future).await.unwrap();

        let upcoming = store.list_upcoming(now).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, future.id);
    }

    #[tokio::test]
    async fn wallet_debit_is_conditional() {
        let store = MemoryStore::new();
        let tourist = Tourist::new(
            "sara",
            "sara@example.com",
            NaiveDate::from_ymd_opt(1995, 6, 1).unwrap(),
            100.0,
        );
        TouristRepository::create(&store, &tourist).await.unwrap();

        assert_eq!(store.debit_wallet(tourist.id, 101.0).await.unwrap(), None);
        let after = TouristRepository::get_active(&store, tourist.id)
            .await
            .unwrap()
            .unwrap();
        assert!((after.wallet - 100.0).abs() < 1e-9);

        assert_eq!(store.debit_wallet(tourist.id, 100.0).await.unwrap(), Some(0.0));
    }

    #[tokio::test]
    async fn usage_counter_never_goes_negative() {
        let store = MemoryStore::new();
        let promo = PromoCode::new("ONCE", 15.0, Utc::now() + Duration::days(1), 1);
        PromoCodeRepository::create(&store, &promo).await.unwrap();

        assert_eq!(store.adjust_usage("ONCE", -1).await.unwrap(), Some(0));
        assert_eq!(store.adjust_usage("ONCE", -1).await.unwrap(), None);
        assert_eq!(store.adjust_usage("ONCE", 1).await.unwrap(), Some(1));
        assert_eq!(store.adjust_usage("MISSING", -1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn complete_past_due_touches_only_matching_kind() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let tourist_id = Uuid::new_v4();

        let past_activity = item(ItemKind::Activity, now - Duration::days(1));
        let past_hotel = item(ItemKind::Hotel, now - Duration::days(1));
        let future_activity = item(ItemKind::Activity, now + Duration::days(1));

        for i in [&past_activity, &past_hotel, &future_activity] {
            let b = Booking::new(i, tourist_id, i.price, PaymentMethod::Wallet);
            BookingRepository::create(&store, &b).await.unwrap();
        }

        let updated = store.complete_past_due(ItemKind::Activity, now).await.unwrap();
        assert_eq!(updated, 1);

        let pending = store.list_pending().await.unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|b| b.kind != ItemKind::Activity || b.date > now));
    }

    #[tokio::test]
    async fn find_pending_matches_on_service_day() {
        let store = MemoryStore::new();
        let tourist_id = Uuid::new_v4();
        let i = item(ItemKind::Transportation, Utc::now() + Duration::days(2));
        let booking = Booking::new(&i, tourist_id, i.price, PaymentMethod::Wallet);
        BookingRepository::create(&store, &booking).await.unwrap();

        let found = store
            .find_pending(tourist_id, i.id, booking.service_day())
            .await
            .unwrap();
        assert!(found.is_some());

        let other_day = booking.service_day() + Duration::days(1);
        let found = store.find_pending(tourist_id, i.id, other_day).await.unwrap();
        assert!(found.is_none());
    }
}
