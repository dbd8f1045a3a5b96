use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use voyago_domain::PaymentMethod;

/// A charge request as the external card processor expects it: the
/// amount in the currency's smallest unit, never a float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    pub success: bool,
    pub transaction_id: String,
}

/// Seam to the external card-payment processor. Implementations are
/// expected to be slow and fallible; callers bound every invocation
/// with a timeout.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_charge(
        &self,
        request: &ChargeRequest,
    ) -> Result<Charge, Box<dyn std::error::Error + Send + Sync>>;
}
