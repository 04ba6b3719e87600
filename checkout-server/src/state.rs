//! Application state shared across all request handlers.

use checkout_core::config::{CheckoutPolicy, ConfigStore};
use checkout_core::gateway::PaymentProcessor;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Payment processor client, built once at startup. `None` when the
    /// processor secret was not configured.
    pub processor: Option<Arc<dyn PaymentProcessor>>,
    /// Checkout policy (can be reloaded via SIGHUP).
    pub policy: ConfigStore<CheckoutPolicy>,
}

impl AppState {
    pub fn new(processor: Option<Arc<dyn PaymentProcessor>>, policy: CheckoutPolicy) -> Self {
        Self {
            processor,
            policy: ConfigStore::new(policy),
        }
    }
}
