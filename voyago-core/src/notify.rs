use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload for an upcoming-booking reminder. Email and push delivery
/// live outside this system; implementations of [`Notifier`] bridge to
/// whatever channel the deployment uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub booking_id: Uuid,
    pub tourist_id: Uuid,
    pub email: String,
    pub username: String,
    pub item_name: String,
    pub date: DateTime<Utc>,
    pub days_until: i64,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        reminder: &Reminder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
