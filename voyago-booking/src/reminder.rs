use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

use voyago_core::notify::{Notifier, Reminder};
use voyago_core::repository::{BookingRepository, ItemRepository, TouristRepository};

/// Daily scan that reminds tourists of paid-for bookings coming up
/// within the look-ahead window.
pub struct ReminderScanner {
    bookings: Arc<dyn BookingRepository>,
    items: Arc<dyn ItemRepository>,
    tourists: Arc<dyn TouristRepository>,
    notifier: Arc<dyn Notifier>,
    window_days: i64,
}

impl ReminderScanner {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        items: Arc<dyn ItemRepository>,
        tourists: Arc<dyn TouristRepository>,
        notifier: Arc<dyn Notifier>,
        window_days: i64,
    ) -> Self {
        Self {
            bookings,
            items,
            tourists,
            notifier,
            window_days,
        }
    }

    /// One pass over active Pending bookings. Delivery failures are
    /// logged per booking and never abort the scan. Returns the number
    /// of reminders sent.
    pub async fn scan(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        let today = now.date_naive();
        let pending = self.bookings.list_pending().await?;
        let mut sent = 0;

        for booking in pending {
            let days_until = (booking.service_day() - today).num_days();
            if days_until < 0 || days_until >= self.window_days {
                continue;
            }

            // Retired accounts or inventory drop out of the scan
            let Some(tourist) = self.tourists.get_active(booking.tourist_id).await? else {
                continue;
            };
            let Some(item) = self.items.get_active(booking.item_id).await? else {
                continue;
            };

            let reminder = Reminder {
                booking_id: booking.id,
                tourist_id: tourist.id,
                email: tourist.email.clone(),
                username: tourist.username.clone(),
                item_name: item.name.clone(),
                date: booking.date,
                days_until,
            };

            match self.notifier.send(&reminder).await {
                Ok(()) => {
                    sent += 1;
                    info!(booking = %booking.id, email = %reminder.email, days_until, "reminder sent");
                }
                Err(e) => {
                    warn!(booking = %booking.id, error = %e, "reminder delivery failed");
                }
            }
        }

        Ok(sent)
    }
}

/// Timer loop for the reminder schedule
pub async fn start_upcoming_reminder(scanner: ReminderScanner, every: Duration) {
    let mut ticker = interval(every);
    info!(period_secs = every.as_secs(), "upcoming-booking reminder started");
    loop {
        ticker.tick().await;
        match scanner.scan(Utc::now()).await {
            Ok(sent) => info!(sent, "reminder scan finished"),
            Err(e) => error!(error = %e, "reminder scan failed"),
        }
    }
}

/// Delivery stand-in that writes reminders to the log. Deployments plug
/// an email/push bridge in behind the `Notifier` trait instead.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        reminder: &Reminder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            email = %reminder.email,
            item = %reminder.item_name,
            date = %reminder.date,
            "upcoming booking reminder"
        );
        Ok(())
    }
}
