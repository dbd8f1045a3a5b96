use serde::Deserialize;
use std::collections::HashMap;
use std::env;

use voyago_domain::ItemKind;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub booking: BookingRules,
    #[serde(default)]
    pub payment: PaymentRules,
    #[serde(default)]
    pub scheduler: SchedulerRules,
}

/// Eligibility rules applied at booking time. Keys are item kinds; a
/// kind without an entry has no age gate.
#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_min_age")]
    pub min_age: HashMap<ItemKind, u32>,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
        }
    }
}

fn default_min_age() -> HashMap<ItemKind, u32> {
    HashMap::from([(ItemKind::Transportation, 18)])
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentRules {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_gateway_timeout")]
    pub gateway_timeout_secs: u64,
}

impl Default for PaymentRules {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            gateway_timeout_secs: default_gateway_timeout(),
        }
    }
}

fn default_currency() -> String {
    "EGP".to_string()
}

fn default_gateway_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerRules {
    #[serde(default = "default_daily")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_daily")]
    pub reminder_interval_secs: u64,
    #[serde(default = "default_reminder_window")]
    pub reminder_window_days: i64,
}

impl Default for SchedulerRules {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_daily(),
            reminder_interval_secs: default_daily(),
            reminder_window_days: default_reminder_window(),
        }
    }
}

fn default_daily() -> u64 {
    86_400
}

fn default_reminder_window() -> i64 {
    10
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of VOYAGO)
            // Eg.. `VOYAGO__PAYMENT__CURRENCY=USD` would set the currency
            .add_source(config::Environment::with_prefix("VOYAGO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
