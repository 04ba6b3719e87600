//! Configuration module for checkout-server.
//!
//! Handles loading configuration from the TOML file, CLI overrides, and
//! the environment-provided processor secret.

pub mod file;

use crate::config::file::FileConfig;
use checkout_core::config::{CheckoutPolicy, RetryPolicy};
use checkout_core::gateway::StripeConfig;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable holding the payment processor secret key.
pub const PROCESSOR_SECRET_ENV: &str = "STRIPE_SECRET_KEY";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Processor connection settings, minus the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorSettings {
    pub api_base: Url,
    pub api_version: String,
    pub timeout: Duration,
}

impl ProcessorSettings {
    /// Combine with the secret key into a [`StripeConfig`].
    pub fn into_stripe_config(self, secret_key: String) -> StripeConfig {
        StripeConfig {
            secret_key,
            api_base: self.api_base,
            api_version: self.api_version,
            timeout: self.timeout,
        }
    }
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub policy: CheckoutPolicy,
    pub processor: ProcessorSettings,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
    api_base_override: Option<Url>,
}

impl ConfigLoader {
    pub fn new(
        config_path: impl AsRef<Path>,
        listen_override: Option<SocketAddr>,
        api_base_override: Option<Url>,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            api_base_override,
        }
    }

    /// Read the TOML file, apply CLI overrides, validate, and build the
    /// runtime configuration.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content)
    }

    fn load_str(&self, config_content: &str) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        if let Some(api_base) = &self.api_base_override {
            file_config.processor.api_base = api_base.clone();
        }

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let checkout = &config.checkout;
    if checkout.currency.len() != 3 || !checkout.currency.bytes().all(|b| b.is_ascii_lowercase())
    {
        return Err(ConfigError::ValidationError(format!(
            "currency must be a lowercase three-letter code, got {:?}",
            checkout.currency
        )));
    }
    if checkout.min_amount < 1 {
        return Err(ConfigError::ValidationError(
            "min_amount must be at least 1".to_string(),
        ));
    }
    if checkout.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "max_attempts must be at least 1".to_string(),
        ));
    }
    if checkout.tolerance < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "tolerance must not be negative".to_string(),
        ));
    }
    if config.processor.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "processor timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let checkout = file_config.checkout;
    LoadedConfig {
        listen: file_config.server.listen,
        policy: CheckoutPolicy {
            currency: checkout.currency,
            min_amount: checkout.min_amount,
            tolerance: checkout.tolerance,
            retry: RetryPolicy {
                max_attempts: checkout.max_attempts,
                delay: Duration::from_millis(checkout.retry_delay_ms),
            },
        },
        processor: ProcessorSettings {
            api_base: file_config.processor.api_base,
            api_version: file_config.processor.api_version,
            timeout: Duration::from_secs(file_config.processor.timeout_secs),
        },
    }
}

/// Get the processor secret key from the environment.
///
/// An unset or blank variable yields `None`; the server still starts and
/// answers every checkout request with a configuration error.
pub fn get_processor_secret() -> Option<String> {
    std::env::var(PROCESSOR_SECRET_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
