//! TOML file configuration structures.
//!
//! These structs directly map to the `checkout-config.toml` file format.
//! Every section is optional; omitted values take the defaults below.

use checkout_core::config::{
    DEFAULT_CURRENCY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_AMOUNT, DEFAULT_RETRY_DELAY,
    default_tolerance,
};
use checkout_core::gateway::StripeConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub processor: ProcessorConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Checkout policy section. Reloaded on SIGHUP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Lowercase ISO 4217 currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Minimum order amount in minor units (cents).
    #[serde(default = "default_min_amount")]
    pub min_amount: i64,
    /// Total calls to the processor per authorization.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Wait between rate-limited attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Allowed difference between claimed and computed totals.
    #[serde(default = "default_tolerance", with = "rust_decimal::serde::float")]
    pub tolerance: Decimal,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            min_amount: default_min_amount(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_min_amount() -> i64 {
    DEFAULT_MIN_AMOUNT
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY.as_millis() as u64
}

/// Payment processor connection section. The secret key is never read
/// from this file; it comes from `STRIPE_SECRET_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    #[serde(default = "default_api_base")]
    pub api_base: Url,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> Url {
    Url::parse(StripeConfig::DEFAULT_API_BASE).expect("valid default processor url")
}

fn default_api_version() -> String {
    StripeConfig::DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    StripeConfig::DEFAULT_TIMEOUT.as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[checkout]
currency = "eur"
min_amount = 100
max_attempts = 5
retry_delay_ms = 250
tolerance = 0.05

[processor]
api_base = "http://localhost:12111"
api_version = "2024-06-20"
timeout_secs = 10
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.checkout.currency, "eur");
        assert_eq!(config.checkout.min_amount, 100);
        assert_eq!(config.checkout.max_attempts, 5);
        assert_eq!(config.checkout.retry_delay_ms, 250);
        assert_eq!(config.checkout.tolerance, Decimal::new(5, 2));
        assert_eq!(config.processor.api_base.as_str(), "http://localhost:12111/");
        assert_eq!(config.processor.timeout_secs, 10);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.checkout.currency, "usd");
        assert_eq!(config.checkout.min_amount, 50);
        assert_eq!(config.checkout.max_attempts, 3);
        assert_eq!(config.checkout.retry_delay_ms, 1000);
        assert_eq!(config.checkout.tolerance, Decimal::new(1, 2));
        assert_eq!(config.processor.api_base.as_str(), "https://api.stripe.com/");
        assert_eq!(config.processor.api_version, "2023-10-16");
    }

    #[test]
    fn test_partial_section() {
        let config: FileConfig = toml::from_str("[checkout]\nmax_attempts = 1\n").unwrap();
        assert_eq!(config.checkout.max_attempts, 1);
        assert_eq!(config.checkout.currency, "usd");
    }
}
