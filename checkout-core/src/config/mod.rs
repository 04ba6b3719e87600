//! Runtime configuration types for the checkout pipeline.
//!
//! Loading and parsing the config file is handled by the server crate;
//! these are the validated values the pipeline runs on.

mod config_store;
mod policy;

pub use config_store::{ConfigStore, ConfigWatcher};
pub use policy::{
    CheckoutPolicy, DEFAULT_CURRENCY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_AMOUNT,
    DEFAULT_RETRY_DELAY, RetryPolicy, default_tolerance,
};
