use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use voyago_domain::{BookableItem, Booking, BookingStatus, ItemKind, Lifecycle, PromoCode, Tourist};

/// Repository trait for bookable inventory
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list_active(
        &self,
    ) -> Result<Vec<BookableItem>, Box<dyn std::error::Error + Send + Sync>>;

    /// Active items whose service date is on or after `from`
    async fn list_upcoming(
        &self,
        from: DateTime<Utc>,
    ) -> Result<Vec<BookableItem>, Box<dyn std::error::Error + Send + Sync>>;

    /// Find-one by id, restricted to active lifecycle
    async fn get_active(
        &self,
        id: Uuid,
    ) -> Result<Option<BookableItem>, Box<dyn std::error::Error + Send + Sync>>;

    async fn create(
        &self,
        item: &BookableItem,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Replace the stored document; returns false when the id is unknown
    async fn update(
        &self,
        item: &BookableItem,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Soft delete / reinstate; returns false when the id is unknown
    async fn set_lifecycle(
        &self,
        id: Uuid,
        lifecycle: Lifecycle,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for booking records
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>>;

    /// An active Pending booking by this tourist for this item on this
    /// service day, if one exists
    async fn find_pending(
        &self,
        tourist_id: Uuid,
        item_id: Uuid,
        service_day: NaiveDate,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>>;

    /// Active bookings for a tourist, optionally narrowed to one status
    async fn list_for_tourist(
        &self,
        tourist_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>>;

    /// Every active Pending booking, any kind (reminder scan input)
    async fn list_pending(
        &self,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Bulk conditional update: every active Pending booking of `kind`
    /// whose service date is strictly before `cutoff` becomes Completed.
    /// Returns the number of records updated.
    async fn complete_past_due(
        &self,
        kind: ItemKind,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for promo codes
#[async_trait]
pub trait PromoCodeRepository: Send + Sync {
    async fn create(
        &self,
        promo: &PromoCode,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Exact-match lookup, active lifecycle only
    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<PromoCode>, Box<dyn std::error::Error + Send + Sync>>;

    /// Per-document-atomic usage-counter adjustment. Returns the new
    /// remaining count, or None when the code is unknown or the
    /// adjustment would drive the counter below zero.
    async fn adjust_usage(
        &self,
        code: &str,
        delta: i64,
    ) -> Result<Option<i64>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for tourist accounts
#[async_trait]
pub trait TouristRepository: Send + Sync {
    async fn create(
        &self,
        tourist: &Tourist,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get_active(
        &self,
        id: Uuid,
    ) -> Result<Option<Tourist>, Box<dyn std::error::Error + Send + Sync>>;

    /// Conditional debit: subtracts `amount` only when the balance
    /// covers it. Returns the new balance, or None on insufficient
    /// funds (balance untouched).
    async fn debit_wallet(
        &self,
        id: Uuid,
        amount: f64,
    ) -> Result<Option<f64>, Box<dyn std::error::Error + Send + Sync>>;

    /// Unconditional credit (compensation path). Returns the new balance.
    async fn credit_wallet(
        &self,
        id: Uuid,
        amount: f64,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
}
