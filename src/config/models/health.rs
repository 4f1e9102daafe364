//! Health monitor configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Warning/critical threshold pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub warning: f64,
    pub critical: f64,
}

impl ThresholdPair {
    pub const fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }
}

/// Health monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HealthConfig {
    /// Database probe settings
    #[serde(default)]
    pub database: DatabaseHealthConfig,
    /// Cache check settings
    #[serde(default)]
    pub cache: CacheHealthConfig,
    /// Reservation subsystem check settings
    #[serde(default)]
    pub reservations: ReservationHealthConfig,
    /// Data consistency probe settings
    #[serde(default)]
    pub consistency: ConsistencyConfig,
    /// Metric alert thresholds
    #[serde(default)]
    pub alerts: AlertThresholds,
    /// Window for system-wide metric aggregation, in seconds
    #[serde(default = "default_metrics_window")]
    pub metrics_window_secs: u64,
}

impl HealthConfig {
    pub fn metrics_window(&self) -> Duration {
        Duration::from_secs(self.metrics_window_secs)
    }
}

fn default_db_warning_ms() -> u64 {
    1000
}

fn default_db_critical_ms() -> u64 {
    3000
}

fn default_probe_tables() -> Vec<String> {
    vec![
        "lofts".to_string(),
        "reservations".to_string(),
        "loft_availability".to_string(),
    ]
}

fn default_probe_limit() -> usize {
    1
}

/// Database probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealthConfig {
    /// Response time above which the database is `warning`
    #[serde(default = "default_db_warning_ms")]
    pub warning_ms: u64,
    /// Response time above which the database is `critical`
    #[serde(default = "default_db_critical_ms")]
    pub critical_ms: u64,
    /// Tables probed with a row-limited select
    #[serde(default = "default_probe_tables")]
    pub probe_tables: Vec<String>,
    /// Row limit of each probe query
    #[serde(default = "default_probe_limit")]
    pub probe_limit: usize,
}

impl Default for DatabaseHealthConfig {
    fn default() -> Self {
        Self {
            warning_ms: default_db_warning_ms(),
            critical_ms: default_db_critical_ms(),
            probe_tables: default_probe_tables(),
            probe_limit: default_probe_limit(),
        }
    }
}

fn default_cache_min_hit_rate() -> f64 {
    70.0
}

fn default_cache_warning_ms() -> f64 {
    100.0
}

fn default_cache_critical_ms() -> f64 {
    500.0
}

/// Cache check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHealthConfig {
    /// Hit rate (percentage) below which an error is counted
    #[serde(default = "default_cache_min_hit_rate")]
    pub min_hit_rate: f64,
    /// Average response time above which an error is counted
    #[serde(default = "default_cache_warning_ms")]
    pub warning_response_ms: f64,
    /// Average response time above which the cache is `critical`
    #[serde(default = "default_cache_critical_ms")]
    pub critical_response_ms: f64,
}

impl Default for CacheHealthConfig {
    fn default() -> Self {
        Self {
            min_hit_rate: default_cache_min_hit_rate(),
            warning_response_ms: default_cache_warning_ms(),
            critical_response_ms: default_cache_critical_ms(),
        }
    }
}

fn default_max_error_rate() -> f64 {
    5.0
}

fn default_min_conversion_rate() -> f64 {
    15.0
}

/// Reservation subsystem check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationHealthConfig {
    /// Error rate (percentage) above which the subsystem is degraded
    #[serde(default = "default_max_error_rate")]
    pub max_error_rate: f64,
    /// Conversion rate (percentage) below which the subsystem is degraded
    #[serde(default = "default_min_conversion_rate")]
    pub min_conversion_rate: f64,
    /// Metrics window in seconds
    #[serde(default = "default_reservation_window")]
    pub metrics_window_secs: u64,
}

impl Default for ReservationHealthConfig {
    fn default() -> Self {
        Self {
            max_error_rate: default_max_error_rate(),
            min_conversion_rate: default_min_conversion_rate(),
            metrics_window_secs: default_reservation_window(),
        }
    }
}

impl ReservationHealthConfig {
    pub fn metrics_window(&self) -> Duration {
        Duration::from_secs(self.metrics_window_secs)
    }
}

fn default_fk_procedure() -> String {
    "check_foreign_key_constraints".to_string()
}

fn default_orphan_limit() -> usize {
    10
}

/// Data consistency probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    /// Optional stored procedure reporting foreign key violations
    #[serde(default = "default_fk_procedure")]
    pub foreign_key_procedure: String,
    /// Row limit of the orphaned reservation lookup
    #[serde(default = "default_orphan_limit")]
    pub orphan_limit: usize,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            foreign_key_procedure: default_fk_procedure(),
            orphan_limit: default_orphan_limit(),
        }
    }
}

fn default_response_time_thresholds() -> ThresholdPair {
    ThresholdPair::new(1000.0, 3000.0)
}

fn default_error_rate_thresholds() -> ThresholdPair {
    ThresholdPair::new(5.0, 10.0)
}

fn default_memory_thresholds() -> ThresholdPair {
    ThresholdPair::new(80.0, 90.0)
}

fn default_cache_hit_rate_thresholds() -> ThresholdPair {
    ThresholdPair::new(70.0, 50.0)
}

/// Two-tier thresholds for metric alert rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Average response time in milliseconds (higher is worse)
    #[serde(default = "default_response_time_thresholds")]
    pub response_time_ms: ThresholdPair,
    /// Error rate percentage (higher is worse)
    #[serde(default = "default_error_rate_thresholds")]
    pub error_rate: ThresholdPair,
    /// Memory usage percentage (higher is worse)
    #[serde(default = "default_memory_thresholds")]
    pub memory_usage: ThresholdPair,
    /// Cache hit rate percentage (lower is worse)
    #[serde(default = "default_cache_hit_rate_thresholds")]
    pub cache_hit_rate: ThresholdPair,
    /// Resolved alerts kept for inspection
    #[serde(default = "default_alert_history_limit")]
    pub history_limit: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            response_time_ms: default_response_time_thresholds(),
            error_rate: default_error_rate_thresholds(),
            memory_usage: default_memory_thresholds(),
            cache_hit_rate: default_cache_hit_rate_thresholds(),
            history_limit: default_alert_history_limit(),
        }
    }
}
