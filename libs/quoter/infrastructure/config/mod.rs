use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::PlanParams;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Quoting agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoterConfig {
    /// Market to quote, e.g. "SOL/USDC"
    #[serde(default = "default_market")]
    pub market: String,
    /// Smallest price increment on the venue
    #[serde(default = "default_tick_size")]
    pub tick_size: f64,
    /// Quote this many ticks inside the current top of book
    #[serde(default = "default_quote_offset_ticks")]
    pub quote_offset_ticks: f64,
    /// Target size per side, in base units
    #[serde(default = "default_order_size")]
    pub order_size: f64,
    /// Reconciliation cadence
    #[serde(default = "default_requote_interval_ms")]
    pub requote_interval_ms: u64,
    /// Size shortfalls below this are not worth a top-up order
    #[serde(default = "default_min_reinforce_increment")]
    pub min_reinforce_increment: f64,
    /// Resting orders within this many ticks of the target price are
    /// kept instead of cancelled
    #[serde(default = "default_reinforce_tolerance_ticks")]
    pub reinforce_tolerance_ticks: f64,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_market() -> String {
    "SOL/USDC".to_string()
}

fn default_tick_size() -> f64 {
    0.01
}

fn default_quote_offset_ticks() -> f64 {
    1.0
}

fn default_order_size() -> f64 {
    100.0
}

fn default_requote_interval_ms() -> u64 {
    2000
}

fn default_min_reinforce_increment() -> f64 {
    0.1
}

fn default_reinforce_tolerance_ticks() -> f64 {
    1.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for QuoterConfig {
    fn default() -> Self {
        Self {
            market: default_market(),
            tick_size: default_tick_size(),
            quote_offset_ticks: default_quote_offset_ticks(),
            order_size: default_order_size(),
            requote_interval_ms: default_requote_interval_ms(),
            min_reinforce_increment: default_min_reinforce_increment(),
            reinforce_tolerance_ticks: default_reinforce_tolerance_ticks(),
            log_level: default_log_level(),
        }
    }
}

impl QuoterConfig {
    /// Load configuration from YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let config: QuoterConfig = serde_yaml::from_str(&yaml_content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.market.is_empty() {
            return Err(ConfigError::ValidationError(
                "market cannot be empty".to_string(),
            ));
        }

        if self.tick_size <= 0.0 {
            return Err(ConfigError::ValidationError(
                "tick_size must be greater than 0".to_string(),
            ));
        }

        if self.quote_offset_ticks <= 0.0 {
            return Err(ConfigError::ValidationError(
                "quote_offset_ticks must be greater than 0".to_string(),
            ));
        }

        if self.order_size <= 0.0 {
            return Err(ConfigError::ValidationError(
                "order_size must be greater than 0".to_string(),
            ));
        }

        if self.requote_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "requote_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.min_reinforce_increment < 0.0 {
            return Err(ConfigError::ValidationError(
                "min_reinforce_increment cannot be negative".to_string(),
            ));
        }

        if self.reinforce_tolerance_ticks < 0.0 {
            return Err(ConfigError::ValidationError(
                "reinforce_tolerance_ticks cannot be negative".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Price distance from the top of book to quote at
    pub fn offset(&self) -> f64 {
        self.tick_size * self.quote_offset_ticks
    }

    pub fn plan_params(&self) -> PlanParams {
        PlanParams {
            tick_size: self.tick_size,
            reinforce_tolerance_ticks: self.reinforce_tolerance_ticks,
            min_increment: self.min_reinforce_increment,
        }
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Market: {}", self.market);
        info!("  Tick size: {}", self.tick_size);
        info!(
            "  Quote offset: {} ticks ({})",
            self.quote_offset_ticks,
            self.offset()
        );
        info!("  Order size: {}", self.order_size);
        info!("  Requote interval: {} ms", self.requote_interval_ms);
        info!("  Min reinforce increment: {}", self.min_reinforce_increment);
        info!(
            "  Reinforce tolerance: {} ticks",
            self.reinforce_tolerance_ticks
        );
        info!("  Log level: {}", self.log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = QuoterConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.offset() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "market: \"BTC/USDC\"\n\
             tick_size: 0.5\n\
             quote_offset_ticks: 2\n\
             order_size: 0.25\n\
             requote_interval_ms: 500\n\
             log_level: \"debug\""
        )
        .unwrap();

        let config = QuoterConfig::load(file.path()).unwrap();
        assert_eq!(config.market, "BTC/USDC");
        assert!((config.offset() - 1.0).abs() < 1e-9);
        assert_eq!(config.requote_interval_ms, 500);
        // Unset fields fall back to defaults.
        assert!((config.min_reinforce_increment - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = QuoterConfig::default();
        config.tick_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = QuoterConfig::default();
        config.order_size = -1.0;
        assert!(config.validate().is_err());

        let mut config = QuoterConfig::default();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = QuoterConfig::default();
        config.market = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_plan_params_mirror_config() {
        let config = QuoterConfig::default();
        let params = config.plan_params();
        assert!((params.tick_size - config.tick_size).abs() < 1e-9);
        assert!((params.min_increment - config.min_reinforce_increment).abs() < 1e-9);
    }
}
