use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use voyago_core::payment::{Charge, ChargeRequest, PaymentGateway};
use voyago_core::repository::{BookingRepository, ItemRepository, TouristRepository};
use voyago_domain::{Booking, BookingStatus, PaymentMethod, TransitionError};
use voyago_store::{BookingRules, PaymentRules};

use crate::promo::{PromoError, PromoValidator, Redemption};

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub item_id: Uuid,
    pub tourist_id: Uuid,
    /// Raw client-supplied method; absent defaults to wallet
    pub payment_method: Option<String>,
    pub promo_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: Uuid,
    pub final_price: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0} not found or inactive")]
    NotFound(&'static str),

    #[error("tourist must be at least {required} years old to book this item")]
    Ineligible { required: u32, age: i32 },

    #[error("booking is closed for this item")]
    BookingClosed,

    #[error("invalid or expired promo code")]
    InvalidPromoCode,

    #[error("promo code usage limit exceeded")]
    UsageLimitExceeded,

    #[error("a pending booking for this item on the same date already exists")]
    DuplicateBooking,

    #[error("insufficient wallet balance")]
    InsufficientFunds,

    #[error("payment failed: {0}")]
    PaymentFailed(String),

    #[error("invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("datastore failure: {0}")]
    Store(String),
}

impl From<PromoError> for BookingError {
    fn from(err: PromoError) -> Self {
        match err {
            PromoError::NotFound | PromoError::Expired => BookingError::InvalidPromoCode,
            PromoError::UsageLimitExceeded => BookingError::UsageLimitExceeded,
            PromoError::Store(msg) => BookingError::Store(msg),
        }
    }
}

/// Drives a booking request from eligibility checks through payment to a
/// persisted Pending booking. Promo usage and wallet debits are reserved
/// before the booking commits and released again on any downstream
/// failure (reserve-then-commit).
pub struct BookingOrchestrator {
    items: Arc<dyn ItemRepository>,
    bookings: Arc<dyn BookingRepository>,
    tourists: Arc<dyn TouristRepository>,
    promos: PromoValidator,
    gateway: Arc<dyn PaymentGateway>,
    booking_rules: BookingRules,
    payment_rules: PaymentRules,
}

impl BookingOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        items: Arc<dyn ItemRepository>,
        bookings: Arc<dyn BookingRepository>,
        tourists: Arc<dyn TouristRepository>,
        promos: PromoValidator,
        gateway: Arc<dyn PaymentGateway>,
        booking_rules: BookingRules,
        payment_rules: PaymentRules,
    ) -> Self {
        Self {
            items,
            bookings,
            tourists,
            promos,
            gateway,
            booking_rules,
            payment_rules,
        }
    }

    pub async fn book(&self, req: &BookingRequest) -> Result<BookingConfirmation, BookingError> {
        let now = Utc::now();

        // 1. Resolve the payment method before touching anything
        let method = match req.payment_method.as_deref() {
            None => PaymentMethod::Wallet,
            Some(raw) => raw
                .parse::<PaymentMethod>()
                .map_err(|e| BookingError::InvalidPaymentMethod(e.0))?,
        };

        // 2. Resolve the tourist
        let tourist = self
            .tourists
            .get_active(req.tourist_id)
            .await
            .map_err(store_err)?
            .ok_or(BookingError::NotFound("tourist"))?;

        // 3. Fetch the item
        let item = self
            .items
            .get_active(req.item_id)
            .await
            .map_err(store_err)?
            .ok_or(BookingError::NotFound("item"))?;
        if !item.booking_open {
            return Err(BookingError::BookingClosed);
        }

        // 4. Per-kind age gate; the minimum itself counts as eligible
        if let Some(&required) = self.booking_rules.min_age.get(&item.kind) {
            let age = tourist.age_on(now.date_naive());
            if age < required as i32 {
                return Err(BookingError::Ineligible { required, age });
            }
        }

        // 5. Promo validity (pure read; the reservation happens after the
        //    duplicate check)
        let discount = match req.promo_code.as_deref() {
            Some(code) => Some(self.promos.validate(code, now).await?),
            None => None,
        };

        // 6. One pending booking per tourist per item per service day
        if self
            .bookings
            .find_pending(tourist.id, item.id, item.date.date_naive())
            .await
            .map_err(store_err)?
            .is_some()
        {
            return Err(BookingError::DuplicateBooking);
        }

        // 7. Final price
        let final_price = match discount {
            Some(d) => item.price * (1.0 - d / 100.0),
            None => item.price,
        };

        // 8. Reserve the promo use
        let redemption = match req.promo_code.as_deref() {
            Some(code) => Some(self.promos.redeem(code, now).await?),
            None => None,
        };

        // 9. Payment dispatch
        let mut wallet_debited = false;
        let payment_result = match method {
            PaymentMethod::Wallet => match self.tourists.debit_wallet(tourist.id, final_price).await
            {
                Err(e) => Err(store_err(e)),
                Ok(None) => Err(BookingError::InsufficientFunds),
                Ok(Some(balance)) => {
                    wallet_debited = true;
                    info!(tourist = %tourist.id, balance, "wallet debited");
                    Ok(())
                }
            },
            PaymentMethod::Card => self.charge_card(final_price, method).await,
        };
        if let Err(err) = payment_result {
            self.release_promo(redemption.as_ref()).await;
            return Err(err);
        }

        // 10. Persist the booking
        let booking = Booking::new(&item, tourist.id, final_price, method);
        if let Err(e) = self.bookings.create(&booking).await {
            self.release_promo(redemption.as_ref()).await;
            if wallet_debited {
                if let Err(credit_err) = self.tourists.credit_wallet(tourist.id, final_price).await
                {
                    error!(
                        tourist = %tourist.id,
                        error = %credit_err,
                        "wallet refund failed after booking persistence failure"
                    );
                }
            }
            if method == PaymentMethod::Card {
                // The charge stands without a booking record; surfaced for
                // operational follow-up
                error!(item = %item.id, tourist = %tourist.id, "card charged but booking not persisted");
            }
            return Err(store_err(e));
        }

        info!(
            booking = %booking.id,
            item = %item.id,
            tourist = %tourist.id,
            price = final_price,
            "booking created"
        );

        Ok(BookingConfirmation {
            booking_id: booking.id,
            final_price,
        })
    }

    /// Cancel a Pending booking. Only the booking's own tourist may
    /// cancel; anything past Pending is refused by the state machine.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        tourist_id: Uuid,
    ) -> Result<Booking, BookingError> {
        let mut booking = self
            .bookings
            .get(booking_id)
            .await
            .map_err(store_err)?
            .ok_or(BookingError::NotFound("booking"))?;

        if booking.tourist_id != tourist_id {
            return Err(BookingError::NotFound("booking"));
        }

        booking.cancel()?;
        self.bookings
            .update_status(booking.id, BookingStatus::Cancelled)
            .await
            .map_err(store_err)?;

        info!(booking = %booking.id, "booking cancelled");
        Ok(booking)
    }

    async fn charge_card(
        &self,
        final_price: f64,
        method: PaymentMethod,
    ) -> Result<(), BookingError> {
        let request = ChargeRequest {
            amount_minor: (final_price * 100.0).round() as i64,
            currency: self.payment_rules.currency.clone(),
            method,
        };

        let limit = Duration::from_secs(self.payment_rules.gateway_timeout_secs);
        match tokio::time::timeout(limit, self.gateway.create_charge(&request)).await {
            Err(_) => Err(BookingError::PaymentFailed("gateway timed out".to_string())),
            Ok(Err(e)) => Err(BookingError::PaymentFailed(e.to_string())),
            Ok(Ok(Charge { success: false, .. })) => {
                Err(BookingError::PaymentFailed("charge declined".to_string()))
            }
            Ok(Ok(charge)) => {
                info!(
                    transaction = %charge.transaction_id,
                    amount_minor = request.amount_minor,
                    "card charge accepted"
                );
                Ok(())
            }
        }
    }

    async fn release_promo(&self, redemption: Option<&Redemption>) {
        if let Some(r) = redemption {
            if let Err(e) = self.promos.release(&r.code).await {
                error!(code = %r.code, error = %e, "failed to release promo reservation");
            }
        }
    }
}

fn store_err(e: Box<dyn std::error::Error + Send + Sync>) -> BookingError {
    BookingError::Store(e.to_string())
}

/// Gateway stand-in for tests and local runs
pub struct MockGateway {
    decline: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self { decline: false }
    }

    /// A gateway that rejects every charge
    pub fn declining() -> Self {
        Self { decline: true }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_charge(
        &self,
        request: &ChargeRequest,
    ) -> Result<Charge, Box<dyn std::error::Error + Send + Sync>> {
        if self.decline {
            return Ok(Charge {
                success: false,
                transaction_id: String::new(),
            });
        }
        Ok(Charge {
            success: true,
            transaction_id: format!("mock_ch_{}", request.amount_minor),
        })
    }
}
