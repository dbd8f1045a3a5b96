use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voyago_booking::{
    reminder::{start_upcoming_reminder, LogNotifier},
    sweeper::start_deadline_sweeper,
    DeadlineSweeper, ReminderScanner,
};
use voyago_store::MemoryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voyago_scheduler=info,voyago_booking=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = voyago_store::Config::load().expect("Failed to load config");
    tracing::info!(
        sweep_interval_secs = config.scheduler.sweep_interval_secs,
        reminder_window_days = config.scheduler.reminder_window_days,
        "Starting Voyago scheduler"
    );

    // The in-memory store stands in for the deployment's datastore; a
    // driver-backed implementation of the same traits drops in here.
    let store = Arc::new(MemoryStore::new());

    let sweeper = DeadlineSweeper::new(store.clone());
    let sweep_task = tokio::spawn(start_deadline_sweeper(
        sweeper,
        Duration::from_secs(config.scheduler.sweep_interval_secs),
    ));

    let scanner = ReminderScanner::new(
        store.clone(),
        store.clone(),
        store,
        Arc::new(LogNotifier),
        config.scheduler.reminder_window_days,
    );
    let reminder_task = tokio::spawn(start_upcoming_reminder(
        scanner,
        Duration::from_secs(config.scheduler.reminder_interval_secs),
    ));

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutting down");

    sweep_task.abort();
    reminder_task.abort();
}
