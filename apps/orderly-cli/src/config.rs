//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

use orderly_core::Currency;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Reference currency for bare amounts and zero totals
    pub currency: Currency,

    /// tracing-subscriber filter directive
    pub log_filter: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (the environment, in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = CliConfig {
            currency: lookup("ORDERLY_CURRENCY")
                .unwrap_or_else(|| "USD".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ORDERLY_CURRENCY".to_string()))?,

            log_filter: lookup("ORDERLY_LOG").unwrap_or_else(|| "info".to_string()),

            pretty: lookup("ORDERLY_PRETTY")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ORDERLY_PRETTY".to_string()))?,
        };

        if config.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue("ORDERLY_LOG".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
