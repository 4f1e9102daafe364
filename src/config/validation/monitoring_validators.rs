//! Monitoring configuration validators
//!
//! This module provides validation implementations for the performance,
//! health, initialization and logging configuration sections.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

fn validate_pair(name: &str, pair: &ThresholdPair, higher_is_worse: bool) -> Result<(), String> {
    if pair.warning < 0.0 || pair.critical < 0.0 {
        return Err(format!("{} thresholds must not be negative", name));
    }
    if higher_is_worse && pair.warning > pair.critical {
        return Err(format!(
            "{} warning threshold ({}) must not exceed critical threshold ({})",
            name, pair.warning, pair.critical
        ));
    }
    if !higher_is_worse && pair.warning < pair.critical {
        return Err(format!(
            "{} warning threshold ({}) must not be below critical threshold ({})",
            name, pair.warning, pair.critical
        ));
    }
    Ok(())
}

impl Validate for PerformanceConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating performance configuration");

        if self.max_samples == 0 {
            return Err("max_samples must be greater than 0".to_string());
        }
        if self.sweep_interval_secs == 0 {
            return Err("sweep_interval_secs must be greater than 0".to_string());
        }
        if self.default_threshold_ms == 0 {
            return Err("default_threshold_ms must be greater than 0".to_string());
        }
        if let Some((name, _)) = self.thresholds.iter().find(|(_, ms)| **ms == 0) {
            return Err(format!("Threshold for '{}' must be greater than 0", name));
        }
        if self.recommendations.slow_operation_factor < 1.0 {
            return Err("slow_operation_factor must be at least 1.0".to_string());
        }

        Ok(())
    }
}

impl Validate for HealthConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating health configuration");

        if self.database.warning_ms > self.database.critical_ms {
            return Err("Database warning_ms must not exceed critical_ms".to_string());
        }
        if self.database.probe_limit == 0 {
            return Err("Database probe_limit must be greater than 0".to_string());
        }
        if self.cache.warning_response_ms > self.cache.critical_response_ms {
            return Err(
                "Cache warning_response_ms must not exceed critical_response_ms".to_string(),
            );
        }
        if !(0.0..=100.0).contains(&self.cache.min_hit_rate) {
            return Err("Cache min_hit_rate must be a percentage".to_string());
        }
        if self.reservations.metrics_window_secs == 0 || self.metrics_window_secs == 0 {
            return Err("Metric windows must be greater than 0".to_string());
        }

        validate_pair("Response time", &self.alerts.response_time_ms, true)?;
        validate_pair("Error rate", &self.alerts.error_rate, true)?;
        validate_pair("Memory usage", &self.alerts.memory_usage, true)?;
        validate_pair("Cache hit rate", &self.alerts.cache_hit_rate, false)?;

        Ok(())
    }
}

impl Validate for InitializationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enable_health_monitoring && self.health_check_interval_secs == 0 {
            return Err(
                "health_check_interval_secs must be greater than 0 when health monitoring is enabled"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
