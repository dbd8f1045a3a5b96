use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::{BookableItem, ItemKind, Lifecycle};

/// Booking lifecycle status. The only legal transitions are
/// Pending -> Completed (sweeper or delivery) and Pending -> Cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Completed,
    Cancelled,
}

/// How the tourist paid for a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Wallet,
    Card,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wallet" => Ok(PaymentMethod::Wallet),
            "card" => Ok(PaymentMethod::Card),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid booking transition from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

/// A reservation linking a tourist to a bookable item, with the price
/// actually charged and the item's service date frozen at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub item_id: Uuid,
    pub kind: ItemKind,
    pub tourist_id: Uuid,
    pub status: BookingStatus,
    /// Copy of the item's service deadline at booking time
    pub date: DateTime<Utc>,
    /// Final charged price, after any promo discount
    pub price: f64,
    pub payment: PaymentMethod,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(item: &BookableItem, tourist_id: Uuid, price: f64, payment: PaymentMethod) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            item_id: item.id,
            kind: item.kind,
            tourist_id,
            status: BookingStatus::Pending,
            date: item.date,
            price,
            payment,
            lifecycle: Lifecycle::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// The UTC calendar day of the service date, used for the
    /// one-pending-booking-per-item-per-day check
    pub fn service_day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.transition(BookingStatus::Completed)
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transition(BookingStatus::Cancelled)
    }

    fn transition(&mut self, to: BookingStatus) -> Result<(), TransitionError> {
        if self.status != BookingStatus::Pending {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}
