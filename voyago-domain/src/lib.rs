pub mod booking;
pub mod item;
pub mod promo;
pub mod tourist;

pub use booking::{Booking, BookingStatus, PaymentMethod, TransitionError, UnknownPaymentMethod};
pub use item::{BookableItem, ItemKind, Lifecycle};
pub use promo::PromoCode;
pub use tourist::Tourist;
