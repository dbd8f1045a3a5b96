use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::Lifecycle;

/// A discount token with an expiry date and a finite redemption count.
/// `usage_limit` is the number of redemptions left; it never goes below
/// zero (the store refuses the decrement instead).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub discount_percent: f64,
    pub expiry_date: DateTime<Utc>,
    pub usage_limit: i64,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
}

impl PromoCode {
    pub fn new(
        code: impl Into<String>,
        discount_percent: f64,
        expiry_date: DateTime<Utc>,
        usage_limit: i64,
    ) -> Self {
        Self {
            code: code.into(),
            discount_percent,
            expiry_date,
            usage_limit,
            lifecycle: Lifecycle::Active,
            created_at: Utc::now(),
        }
    }

    /// Redemption requires the expiry date to be strictly in the future
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date <= now
    }

    pub fn has_remaining_uses(&self) -> bool {
        self.usage_limit > 0
    }

    /// Price after applying this code's percentage discount
    pub fn discounted(&self, price: f64) -> f64 {
        price * (1.0 - self.discount_percent / 100.0)
    }
}
