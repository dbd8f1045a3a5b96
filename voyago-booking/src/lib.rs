pub mod orchestrator;
pub mod promo;
pub mod reminder;
pub mod sweeper;

pub use orchestrator::{
    BookingConfirmation, BookingError, BookingOrchestrator, BookingRequest, MockGateway,
};
pub use promo::{PromoError, PromoValidator, Redemption};
pub use reminder::{LogNotifier, ReminderScanner};
pub use sweeper::{DeadlineSweeper, SweepError, SweepReport};
