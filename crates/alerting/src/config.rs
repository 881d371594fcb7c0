//! Alert configuration

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Alert configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertConfigError {
    #[error("cooldown_minutes {0} is beyond the representable time range")]
    CooldownOutOfRange(u64),
}

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Window during which a repeat alert for the same patient and vital is suppressed (minutes)
    pub cooldown_minutes: u64,
    /// Upper bound on any single sink call (milliseconds)
    pub sink_timeout_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: 15,
            sink_timeout_ms: 5000,
        }
    }
}

impl AlertConfig {
    /// Longer cooldown, tighter sink timeout
    pub fn strict() -> Self {
        Self {
            cooldown_minutes: 30,
            sink_timeout_ms: 2000,
        }
    }

    /// Short cooldown for wards that want every repeat surfaced
    pub fn lenient() -> Self {
        Self {
            cooldown_minutes: 5,
            ..Default::default()
        }
    }

    /// Cooldown as a wall-clock duration, `None` when it does not fit
    pub fn cooldown(&self) -> Option<chrono::Duration> {
        i64::try_from(self.cooldown_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
    }

    /// Reject a cooldown whose window start cannot be computed
    pub fn validate(&self) -> Result<(), AlertConfigError> {
        self.cooldown()
            .and_then(|cooldown| Utc::now().checked_sub_signed(cooldown))
            .map(|_| ())
            .ok_or(AlertConfigError::CooldownOutOfRange(self.cooldown_minutes))
    }

    /// Sink timeout as a duration
    pub fn sink_timeout(&self) -> Duration {
        Duration::from_millis(self.sink_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AlertConfig::default();
        assert_eq!(config.cooldown_minutes, 15);
        assert_eq!(config.cooldown(), Some(chrono::Duration::minutes(15)));
        assert!(config.validate().is_ok());
        assert_eq!(config.sink_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_presets() {
        assert!(AlertConfig::strict().cooldown_minutes > AlertConfig::default().cooldown_minutes);
        assert!(AlertConfig::lenient().cooldown_minutes < AlertConfig::default().cooldown_minutes);
    }

    #[test]
    fn test_oversized_cooldown_rejected() {
        for minutes in [u64::MAX, 1_000_000_000_000] {
            let config = AlertConfig {
                cooldown_minutes: minutes,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(AlertConfigError::CooldownOutOfRange(minutes))
            );
        }
        let config = AlertConfig {
            cooldown_minutes: u64::MAX,
            ..Default::default()
        };
        assert!(config.cooldown().is_none());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: AlertConfig = serde_json::from_str(r#"{"cooldown_minutes": 10}"#).unwrap();
        assert_eq!(config.cooldown_minutes, 10);
        assert_eq!(config.sink_timeout_ms, 5000);
    }
}
