pub mod app_config;
pub mod memory;

pub use app_config::{BookingRules, Config, PaymentRules, SchedulerRules};
pub use memory::MemoryStore;
