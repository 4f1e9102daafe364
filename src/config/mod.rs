//! Configuration management for the monitoring layer
//!
//! This module handles loading, validation, and serialization of all configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Performance recorder configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
    /// Health monitor configuration
    #[serde(default)]
    pub health: HealthConfig,
    /// Service initialization configuration
    #[serde(default)]
    pub initialization: InitializationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MonitorError::config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| MonitorError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Starts from defaults and applies `LOFT_MONITOR_*` overrides.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();

        if let Ok(env) = std::env::var("LOFT_MONITOR_ENV") {
            config.initialization.environment = env.parse().map_err(MonitorError::config)?;
        }
        if let Ok(secs) = std::env::var("LOFT_MONITOR_HEALTH_INTERVAL_SECS") {
            config.initialization.health_check_interval_secs = secs.parse().map_err(|e| {
                MonitorError::config(format!("Invalid LOFT_MONITOR_HEALTH_INTERVAL_SECS: {}", e))
            })?;
        }
        if let Ok(max) = std::env::var("LOFT_MONITOR_MAX_SAMPLES") {
            config.performance.max_samples = max.parse().map_err(|e| {
                MonitorError::config(format!("Invalid LOFT_MONITOR_MAX_SAMPLES: {}", e))
            })?;
        }
        if let Ok(ids) = std::env::var("LOFT_MONITOR_WARMUP_LOFTS") {
            config.initialization.warmup_loft_ids = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(level) = std::env::var("LOFT_MONITOR_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.performance
            .validate()
            .map_err(|e| MonitorError::config(format!("Performance config error: {}", e)))?;
        self.health
            .validate()
            .map_err(|e| MonitorError::config(format!("Health config error: {}", e)))?;
        self.initialization
            .validate()
            .map_err(|e| MonitorError::config(format!("Initialization config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| MonitorError::config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MonitorError::config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| MonitorError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = r#"
performance:
  max_samples: 500
  thresholds:
    loft_search: 800

health:
  database:
    warning_ms: 250
    critical_ms: 900
  alerts:
    memory_usage:
      warning: 70
      critical: 85

initialization:
  environment: production
  health_check_interval_secs: 15
  warmup_loft_ids: ["loft-1", "loft-2"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.performance.max_samples, 500);
        assert_eq!(config.performance.threshold_for("loft_search"), 800);
        // Unknown operations fall back to the default threshold
        assert_eq!(config.performance.threshold_for("unlisted"), 1000);
        assert_eq!(config.health.database.critical_ms, 900);
        assert_eq!(config.health.alerts.memory_usage.critical, 85.0);
        assert_eq!(config.health.alerts.error_rate.warning, 5.0);
        assert!(config.initialization.environment.is_production());
        assert_eq!(config.initialization.warmup_loft_ids.len(), 2);
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn test_config_from_missing_file() {
        let result = Config::from_file("/nonexistent/loft-monitor.yaml").await;
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let result = Config::from_yaml("performance:\n  max_samples: 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let json = config.to_json().unwrap();
        assert!(json.contains("\"max_samples\": 10000"));

        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.performance.max_samples, config.performance.max_samples);
    }
}
