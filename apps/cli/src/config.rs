//! # CLI Configuration
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults                                                            │
//! │  2. TOML file   --config PATH  or  SEARCHABLE_CONFIG=PATH               │
//! │  3. Environment SEARCHABLE_RETURN_URL, SEARCHABLE_CURRENCY,             │
//! │                 SEARCHABLE_PAYMENT_TYPE, SEARCHABLE_LOG_LEVEL           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```toml
//! # searchable.toml
//! return_url = "https://shop.example.com/checkout"
//! currency = "usd"
//! default_payment_type = "balance"
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};

use searchable_core::PaymentType;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CONFIG_PATH_VAR: &str = "SEARCHABLE_CONFIG";
const RETURN_URL_VAR: &str = "SEARCHABLE_RETURN_URL";
const CURRENCY_VAR: &str = "SEARCHABLE_CURRENCY";
const PAYMENT_TYPE_VAR: &str = "SEARCHABLE_PAYMENT_TYPE";
const LOG_LEVEL_VAR: &str = "SEARCHABLE_LOG_LEVEL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Where card checkout returns the buyer (success and cancel).
    pub return_url: String,

    /// Currency of card invoices. Listing currencies only affect display.
    pub currency: String,

    /// Payment type used by `fees` when `--payment-type` is omitted.
    pub default_payment_type: PaymentType,

    /// Log level when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            return_url: "http://localhost:3000/".to_string(),
            currency: "usd".to_string(),
            default_payment_type: PaymentType::Stripe,
            log_level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from file, process environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`CliConfig::load`] with an explicit environment lookup.
    pub fn load_with<F>(config_path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = config_path.or_else(|| env(CONFIG_PATH_VAR).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(&env)?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(?path, "Loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    fn apply_env_overrides<F>(&mut self, env: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env(RETURN_URL_VAR) {
            debug!(return_url = %url, "Overriding return URL from environment");
            self.return_url = url;
        }

        if let Some(currency) = env(CURRENCY_VAR) {
            self.currency = currency;
        }

        if let Some(payment_type) = env(PAYMENT_TYPE_VAR) {
            self.default_payment_type = payment_type
                .parse()
                .map_err(|_| ConfigError::InvalidValue(PAYMENT_TYPE_VAR.to_string()))?;
        }

        if let Some(level) = env(LOG_LEVEL_VAR) {
            self.log_level = level;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.return_url.starts_with("http://") && !self.return_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("return_url".to_string()));
        }

        let currency_ok = (3..=4).contains(&self.currency.len())
            && self.currency.bytes().all(|b| b.is_ascii_alphabetic());
        if !currency_ok {
            return Err(ConfigError::InvalidValue("currency".to_string()));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue("log_level".to_string()));
        }

        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
