use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::{interval, Duration};
use tracing::{error, info};

use voyago_core::repository::BookingRepository;
use voyago_domain::ItemKind;

/// Outcome of one sweep pass: how many bookings each kind finalized
#[derive(Debug, Default)]
pub struct SweepReport {
    pub completed: Vec<(ItemKind, u64)>,
}

impl SweepReport {
    pub fn total(&self) -> u64 {
        self.completed.iter().map(|(_, n)| n).sum()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("deadline sweep aborted at {kind:?}: {reason}")]
pub struct SweepError {
    pub kind: ItemKind,
    pub reason: String,
}

/// Finalizes past-due bookings: every active Pending booking whose
/// service date has passed becomes Completed, one bulk conditional
/// update per kind. Already-Completed records no longer match the
/// filter, so re-running a sweep is a no-op.
pub struct DeadlineSweeper {
    bookings: Arc<dyn BookingRepository>,
}

impl DeadlineSweeper {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// One pass over all kinds. A failing kind aborts the remainder of
    /// the pass; the next scheduled run retries from the top.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, SweepError> {
        let mut report = SweepReport::default();
        for kind in ItemKind::ALL {
            let updated = self
                .bookings
                .complete_past_due(kind, now)
                .await
                .map_err(|e| SweepError {
                    kind,
                    reason: e.to_string(),
                })?;
            if updated > 0 {
                info!(?kind, updated, "past-due bookings completed");
            }
            report.completed.push((kind, updated));
        }
        Ok(report)
    }
}

/// Timer loop for the sweep schedule. Runs until the task is dropped.
pub async fn start_deadline_sweeper(sweeper: DeadlineSweeper, every: Duration) {
    let mut ticker = interval(every);
    info!(period_secs = every.as_secs(), "deadline sweeper started");
    loop {
        ticker.tick().await;
        match sweeper.sweep(Utc::now()).await {
            Ok(report) => info!(completed = report.total(), "deadline sweep finished"),
            Err(e) => error!(error = %e, "deadline sweep failed"),
        }
    }
}
