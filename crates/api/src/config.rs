//! Service configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then `VITALS_*`
//! environment variables (nested keys separated by `__`, e.g.
//! `VITALS_ALERTING__COOLDOWN_MINUTES=30`).

use alerting::{AlertConfig, AlertConfigError};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use vital_signs::{ThresholdError, ThresholdOverrides, ThresholdTable};

use crate::rate_limit::RateLimitConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid alerting configuration: {0}")]
    Alerting(#[from] AlertConfigError),

    #[error("Invalid threshold configuration: {0}")]
    Thresholds(#[from] ThresholdError),

    #[error("Invalid rate limit: {0}")]
    RateLimit(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address
    pub bind_addr: String,
    pub log_format: LogFormat,
    pub alerting: AlertConfig,
    /// Per-vital adjustments to the default reference ranges
    pub thresholds: ThresholdOverrides,
    pub rate_limit: RateLimitConfig,
    /// Maximum alerts kept by the in-memory store
    pub retention: usize,
    /// Capacity of the background ingest queue
    pub ingest_queue: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            log_format: LogFormat::Text,
            alerting: AlertConfig::default(),
            thresholds: ThresholdOverrides::default(),
            rate_limit: RateLimitConfig::default(),
            retention: 10_000,
            ingest_queue: 1024,
        }
    }
}

impl ServiceConfig {
    /// Load from an optional file plus the environment
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        Self::from_builder(builder.add_source(
            Environment::with_prefix("VITALS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        ))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.alerting.validate()?;
        Ok(config)
    }

    /// Validated threshold table with overrides applied
    pub fn threshold_table(&self) -> Result<ThresholdTable, ConfigError> {
        Ok(ThresholdTable::with_overrides(&self.thresholds)?)
    }
}
