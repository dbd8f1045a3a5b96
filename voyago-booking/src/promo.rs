use std::sync::Arc;

use chrono::{DateTime, Utc};

use voyago_core::repository::PromoCodeRepository;

#[derive(Debug, thiserror::Error)]
pub enum PromoError {
    #[error("promo code not found")]
    NotFound,

    #[error("promo code expired")]
    Expired,

    #[error("promo code usage limit exceeded")]
    UsageLimitExceeded,

    #[error("datastore failure: {0}")]
    Store(String),
}

/// A successfully reserved promo use, held by the orchestrator until the
/// booking commits (or released if it does not)
#[derive(Debug, Clone)]
pub struct Redemption {
    pub code: String,
    pub discount_percent: f64,
}

/// Checks promo-code validity and manages the usage counter
pub struct PromoValidator {
    promo_codes: Arc<dyn PromoCodeRepository>,
}

impl PromoValidator {
    pub fn new(promo_codes: Arc<dyn PromoCodeRepository>) -> Self {
        Self { promo_codes }
    }

    /// Pure validity check: exact code match, unexpired, uses remaining.
    /// Returns the discount percentage.
    pub async fn validate(&self, code: &str, now: DateTime<Utc>) -> Result<f64, PromoError> {
        let promo = self
            .promo_codes
            .find_by_code(code)
            .await
            .map_err(store_err)?
            .ok_or(PromoError::NotFound)?;

        if promo.is_expired(now) {
            return Err(PromoError::Expired);
        }
        if !promo.has_remaining_uses() {
            return Err(PromoError::UsageLimitExceeded);
        }
        Ok(promo.discount_percent)
    }

    /// Validate and reserve one use. The conditional decrement settles
    /// the race where two requests validated the same last use: the
    /// loser fails here instead of driving the counter negative.
    pub async fn redeem(&self, code: &str, now: DateTime<Utc>) -> Result<Redemption, PromoError> {
        let discount_percent = self.validate(code, now).await?;

        match self
            .promo_codes
            .adjust_usage(code, -1)
            .await
            .map_err(store_err)?
        {
            Some(_remaining) => Ok(Redemption {
                code: code.to_string(),
                discount_percent,
            }),
            None => Err(PromoError::UsageLimitExceeded),
        }
    }

    /// Return a reserved use after a downstream failure
    pub async fn release(&self, code: &str) -> Result<(), PromoError> {
        self.promo_codes
            .adjust_usage(code, 1)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}

fn store_err(e: Box<dyn std::error::Error + Send + Sync>) -> PromoError {
    PromoError::Store(e.to_string())
}
