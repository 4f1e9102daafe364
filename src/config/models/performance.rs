//! Performance recorder configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-operation latency thresholds in milliseconds
pub fn default_operation_thresholds() -> BTreeMap<String, u64> {
    [
        ("loft_search", 1000),
        ("loft_details", 500),
        ("availability_check", 300),
        ("pricing_calculation", 200),
        ("reservation_creation", 2000),
        ("database_query", 500),
        ("cache_lookup", 50),
    ]
    .into_iter()
    .map(|(name, ms)| (name.to_string(), ms))
    .collect()
}

fn default_threshold_ms() -> u64 {
    1000
}

fn default_slow_operation_factor() -> f64 {
    1.5
}

fn default_min_success_rate() -> f64 {
    95.0
}

fn default_min_cache_hit_rate() -> f64 {
    70.0
}

/// Performance recorder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Hard cap on buffered samples (oldest evicted first)
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    /// Samples older than this are dropped by the sweep
    #[serde(default = "default_sample_retention_hours")]
    pub sample_retention_hours: u64,
    /// Open timers older than this are swept as stale
    #[serde(default = "default_stale_timer_minutes")]
    pub stale_timer_minutes: u64,
    /// Sweep interval in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Per-operation thresholds in milliseconds
    #[serde(default = "default_operation_thresholds")]
    pub thresholds: BTreeMap<String, u64>,
    /// Threshold for operations missing from `thresholds`
    #[serde(default = "default_threshold_ms")]
    pub default_threshold_ms: u64,
    /// Recommendation rules applied by the report generator
    #[serde(default)]
    pub recommendations: RecommendationRules,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            sample_retention_hours: default_sample_retention_hours(),
            stale_timer_minutes: default_stale_timer_minutes(),
            sweep_interval_secs: default_sweep_interval(),
            thresholds: default_operation_thresholds(),
            default_threshold_ms: default_threshold_ms(),
            recommendations: RecommendationRules::default(),
        }
    }
}

impl PerformanceConfig {
    /// Threshold for `operation`, falling back to the default threshold
    pub fn threshold_for(&self, operation: &str) -> u64 {
        self.thresholds
            .get(operation)
            .copied()
            .unwrap_or(self.default_threshold_ms)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.sample_retention_hours.saturating_mul(3600))
    }

    pub fn stale_timer_age(&self) -> Duration {
        Duration::from_secs(self.stale_timer_minutes.saturating_mul(60))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Rule parameters for report recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRules {
    /// An operation is flagged when its average exceeds threshold * factor
    #[serde(default = "default_slow_operation_factor")]
    pub slow_operation_factor: f64,
    /// Minimum acceptable success rate per operation (percentage)
    #[serde(default = "default_min_success_rate")]
    pub min_success_rate: f64,
    /// Minimum acceptable cache hit rate (percentage)
    #[serde(default = "default_min_cache_hit_rate")]
    pub min_cache_hit_rate: f64,
}

impl Default for RecommendationRules {
    fn default() -> Self {
        Self {
            slow_operation_factor: default_slow_operation_factor(),
            min_success_rate: default_min_success_rate(),
            min_cache_hit_rate: default_min_cache_hit_rate(),
        }
    }
}
