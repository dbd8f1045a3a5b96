use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inventory kinds that can be reserved for a date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Activity,
    Itinerary,
    Transportation,
    Flight,
    Hotel,
}

impl ItemKind {
    /// Every kind, in the order the deadline sweeper processes them
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Activity,
        ItemKind::Itinerary,
        ItemKind::Transportation,
        ItemKind::Flight,
        ItemKind::Hotel,
    ];
}

/// Entity lifecycle. Retired entities stay in the datastore but are
/// invisible to every active-only query; nothing is hard-deleted in
/// normal flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    Active,
    Retired,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}

/// A provider-created inventory record: an activity, itinerary,
/// transportation slot, flight or hotel room that tourists can book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableItem {
    pub id: Uuid,
    pub kind: ItemKind,
    pub name: String,
    pub price: f64,
    /// Service deadline: start date for activities, itineraries and
    /// transportation; arrival time for flights; check-out time for hotels.
    pub date: DateTime<Utc>,
    pub booking_open: bool,
    pub lifecycle: Lifecycle,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl BookableItem {
    pub fn new(
        kind: ItemKind,
        name: impl Into<String>,
        price: f64,
        date: DateTime<Utc>,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            price,
            date,
            booking_open: true,
            lifecycle: Lifecycle::Active,
            created_by,
            created_at: Utc::now(),
        }
    }

    /// Soft delete: flagged-inappropriate or withdrawn inventory
    pub fn retire(&mut self) {
        self.lifecycle = Lifecycle::Retired;
    }

    pub fn reinstate(&mut self) {
        self.lifecycle = Lifecycle::Active;
    }

    pub fn is_bookable(&self) -> bool {
        self.lifecycle.is_active() && self.booking_open
    }
}
