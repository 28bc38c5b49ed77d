//! Pull-to-refresh configuration
//!
//! Values can come from component props or from a serialized settings
//! blob; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Error, Result};

/// Default pull distance (damped px) a release must exceed to refresh
pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// Default damping applied to raw finger travel
pub const DEFAULT_RESISTANCE: f64 = 0.5;

/// Default pause between refresh completion and state reset
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 300;

/// Pull-to-refresh configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Damped distance above which a release triggers a refresh
    pub threshold: f64,
    /// Multiplier in (0, 1] applied to raw finger travel
    pub resistance: f64,
    /// Ignore touch input entirely
    pub disabled: bool,
    /// Exit animation window after the refresh resolves
    pub settle_delay_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            resistance: DEFAULT_RESISTANCE,
            disabled: false,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl RefreshConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = resistance;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Check the numeric ranges
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            )));
        }

        if !(self.resistance > 0.0 && self.resistance <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "resistance must be in (0, 1], got {}",
                self.resistance
            )));
        }

        Ok(())
    }

    /// Validated copy of `self`, or the defaults (keeping `disabled`) when invalid
    pub fn or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                tracing::warn!("{}, falling back to defaults", e);
                Self {
                    disabled: self.disabled,
                    ..Self::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RefreshConfig::default();
        assert_eq!(config.threshold, 80.0);
        assert_eq!(config.resistance, 0.5);
        assert!(!config.disabled);
        assert_eq!(config.settle_delay(), Duration::from_millis(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: RefreshConfig = serde_json::from_str(r#"{"threshold": 120.0}"#).unwrap();
        assert_eq!(config.threshold, 120.0);
        assert_eq!(config.resistance, DEFAULT_RESISTANCE);
        assert_eq!(config.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);
    }

    #[test]
    fn test_invalid_threshold() {
        for threshold in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let config = RefreshConfig::default().with_threshold(threshold);
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_resistance_range() {
        assert!(RefreshConfig::default().with_resistance(1.0).validate().is_ok());
        assert!(RefreshConfig::default().with_resistance(0.01).validate().is_ok());
        assert!(RefreshConfig::default().with_resistance(0.0).validate().is_err());
        assert!(RefreshConfig::default().with_resistance(1.5).validate().is_err());
        assert!(RefreshConfig::default().with_resistance(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_or_default_keeps_disabled() {
        let config = RefreshConfig::default()
            .with_threshold(-1.0)
            .with_disabled(true)
            .or_default();
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert!(config.disabled);

        let valid = RefreshConfig::default().with_threshold(60.0);
        assert_eq!(valid.clone().or_default(), valid);
    }
}
