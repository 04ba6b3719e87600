//! Checkout policy: the knobs the pipeline reads per request.

use rust_decimal::Decimal;
use std::time::Duration;

/// Currency every authorization is created in.
pub const DEFAULT_CURRENCY: &str = "usd";
/// Smallest chargeable amount in minor units ($0.50).
pub const DEFAULT_MIN_AMOUNT: i64 = 50;
/// Total calls made to the processor for one authorization.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Fixed wait between rate-limited attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Allowed difference between the claimed and computed cart totals (0.01).
pub fn default_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Bounded fixed-delay retry for transient processor failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Values below 1 behave as 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Lowercase ISO 4217 code sent to the processor.
    pub currency: String,
    /// Minimum order amount in minor units.
    pub min_amount: i64,
    /// Reconciliation tolerance in major currency units.
    pub tolerance: Decimal,
    pub retry: RetryPolicy,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            min_amount: DEFAULT_MIN_AMOUNT,
            tolerance: default_tolerance(),
            retry: RetryPolicy::default(),
        }
    }
}
