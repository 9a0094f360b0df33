//! Application configuration management.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::RateType;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Provider registry configuration.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Fixed exchange rates served by the configured rate provider.
    #[serde(default)]
    pub rates: RatesConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "coinage=info".to_string()
}

/// Provider registry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Provider names hidden from discovery.
    #[serde(default)]
    pub disabled_providers: Vec<String>,
}

/// Fixed exchange rate table.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Provider name the table is published under.
    #[serde(default = "default_rates_provider")]
    pub provider: String,
    /// Rate entries.
    #[serde(default)]
    pub entries: Vec<RateEntry>,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            provider: default_rates_provider(),
            entries: Vec::new(),
        }
    }
}

fn default_rates_provider() -> String {
    "config".to_string()
}

/// A single configured exchange rate (1 base = factor term).
#[derive(Debug, Clone, Deserialize)]
pub struct RateEntry {
    /// Base currency code.
    pub base: String,
    /// Term currency code.
    pub term: String,
    /// Conversion factor, written as a decimal string.
    pub factor: Decimal,
    /// Rate type the entry is published as.
    #[serde(default = "default_rate_type")]
    pub rate_type: RateType,
    /// Day the rate applies to, for dated tables.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

fn default_rate_type() -> RateType {
    RateType::Other
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("COINAGE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("registry.disabled_providers")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Parses configuration from an inline TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed.
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
