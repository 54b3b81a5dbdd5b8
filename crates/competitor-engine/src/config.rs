//! Configuration for competitor analysis runs

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};

/// Longest price history a run may request, in calendar days
pub const MAX_HISTORY_DAYS: i64 = 36_500;

/// Configuration for the analysis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of validated competitors per analysis
    pub max_peers: usize,

    /// Maximum number of snapshots kept in the market data cache
    pub cache_capacity: usize,

    /// Calendar days of daily closes requested per symbol
    pub history_days: i64,

    /// Observations used for the trailing one-year return
    pub one_year_window: usize,

    /// Trading days used to annualize volatility
    pub trading_days_per_year: f64,

    /// Request budget for the live quote provider
    pub requests_per_minute: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_peers: 5,
            cache_capacity: 1024,
            history_days: 365,
            one_year_window: 252,
            trading_days_per_year: 252.0,
            requests_per_minute: 120,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_peers == 0 {
            return Err(StockError::ConfigError(
                "max_peers must be greater than 0".to_string(),
            ));
        }

        if self.cache_capacity == 0 {
            return Err(StockError::ConfigError(
                "cache_capacity must be greater than 0".to_string(),
            ));
        }

        if self.history_days <= 0 || self.history_days > MAX_HISTORY_DAYS {
            return Err(StockError::ConfigError(format!(
                "history_days must be between 1 and {MAX_HISTORY_DAYS}"
            )));
        }

        if self.one_year_window < 2 {
            return Err(StockError::ConfigError(
                "one_year_window needs at least two observations".to_string(),
            ));
        }

        if !(self.trading_days_per_year.is_finite() && self.trading_days_per_year > 0.0) {
            return Err(StockError::ConfigError(
                "trading_days_per_year must be a positive number".to_string(),
            ));
        }

        if self.requests_per_minute == 0 {
            return Err(StockError::ConfigError(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    max_peers: Option<usize>,
    cache_capacity: Option<usize>,
    history_days: Option<i64>,
    one_year_window: Option<usize>,
    trading_days_per_year: Option<f64>,
    requests_per_minute: Option<u32>,
}

impl EngineConfigBuilder {
    /// Set the competitor limit
    pub fn max_peers(mut self, max_peers: usize) -> Self {
        self.max_peers = Some(max_peers);
        self
    }

    /// Set the snapshot cache capacity
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Set the price history length in calendar days
    pub fn history_days(mut self, days: i64) -> Self {
        self.history_days = Some(days);
        self
    }

    /// Set the trailing return window
    pub fn one_year_window(mut self, observations: usize) -> Self {
        self.one_year_window = Some(observations);
        self
    }

    /// Set the volatility annualization factor
    pub fn trading_days_per_year(mut self, days: f64) -> Self {
        self.trading_days_per_year = Some(days);
        self
    }

    /// Set the provider request budget
    pub fn requests_per_minute(mut self, limit: u32) -> Self {
        self.requests_per_minute = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EngineConfig> {
        let defaults = EngineConfig::default();

        let config = EngineConfig {
            max_peers: self.max_peers.unwrap_or(defaults.max_peers),
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
            history_days: self.history_days.unwrap_or(defaults.history_days),
            one_year_window: self.one_year_window.unwrap_or(defaults.one_year_window),
            trading_days_per_year: self
                .trading_days_per_year
                .unwrap_or(defaults.trading_days_per_year),
            requests_per_minute: self
                .requests_per_minute
                .unwrap_or(defaults.requests_per_minute),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_peers, 5);
        assert_eq!(config.one_year_window, 252);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::builder()
            .max_peers(3)
            .cache_capacity(16)
            .build()
            .unwrap();

        assert_eq!(config.max_peers, 3);
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.history_days, 365);
    }

    #[test]
    fn test_validation_rejects_zero_peers() {
        assert!(EngineConfig::builder().max_peers(0).build().is_err());
    }

    #[test]
    fn test_validation_bounds_history_days() {
        assert!(EngineConfig::builder().history_days(0).build().is_err());
        assert!(EngineConfig::builder().history_days(MAX_HISTORY_DAYS).build().is_ok());

        let config = EngineConfig {
            history_days: 10_000_000_000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_bad_annualization() {
        let config = EngineConfig {
            trading_days_per_year: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }
}
