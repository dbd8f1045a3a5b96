pub mod notify;
pub mod payment;
pub mod repository;

pub use notify::{Notifier, Reminder};
pub use payment::{Charge, ChargeRequest, PaymentGateway};
pub use repository::{
    BookingRepository, ItemRepository, PromoCodeRepository, TouristRepository,
};
