//! Types for performance samples and reports

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form metadata attached to a timing span
pub type Context = serde_json::Map<String, Value>;

/// Context key holding the cache hit/miss flag of a sample
pub const CACHE_HIT_KEY: &str = "cache_hit";

/// A single completed timing, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    /// Operation name, e.g. `loft_search`
    pub operation: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Completion time in milliseconds since the Unix epoch
    pub timestamp: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub context: Context,
}

impl PerformanceSample {
    /// Create a sample completed now
    pub fn new(operation: impl Into<String>, duration_ms: u64, success: bool) -> Self {
        Self {
            operation: operation.into(),
            duration_ms,
            timestamp: crate::utils::current_timestamp_millis(),
            success,
            error_type: None,
            context: Context::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_error(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Cache hit flag, if this sample was a cache lookup
    pub fn cache_hit(&self) -> Option<bool> {
        self.context.get(CACHE_HIT_KEY).and_then(Value::as_bool)
    }
}

/// Open timing span
#[derive(Debug, Clone)]
pub(super) struct TimerHandle {
    pub id: String,
    pub operation: String,
    pub start: std::time::Instant,
    /// Start time in milliseconds since the Unix epoch
    pub started_at: u64,
    pub context: Context,
}

/// Per-operation statistics within a report window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationBreakdown {
    pub count: usize,
    pub average_time: f64,
    pub p95_time: u64,
    pub success_rate: f64,
    pub threshold_ms: u64,
    /// Failed samples by error type
    pub error_types: BTreeMap<String, u64>,
}

/// Cache effectiveness derived from samples carrying a `cache_hit` flag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachePerformance {
    pub total_lookups: usize,
    pub hit_rate: f64,
    pub miss_rate: f64,
    pub average_hit_time: f64,
    pub average_miss_time: f64,
}

/// Aggregated view of the samples recorded within a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub window_ms: u64,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub total_operations: usize,
    /// Percentage of successful samples
    pub success_rate: f64,
    pub average_response_time: f64,
    pub p95_response_time: u64,
    pub p99_response_time: u64,
    pub operation_breakdown: BTreeMap<String, OperationBreakdown>,
    /// Up to ten slowest samples, slowest first
    pub slowest_operations: Vec<PerformanceSample>,
    pub cache_performance: CachePerformance,
    pub recommendations: Vec<String>,
}

impl PerformanceReport {
    /// Report for a window without samples
    pub fn empty(window_ms: u64) -> Self {
        Self {
            window_ms,
            generated_at: chrono::Utc::now(),
            total_operations: 0,
            success_rate: 0.0,
            average_response_time: 0.0,
            p95_response_time: 0,
            p99_response_time: 0,
            operation_breakdown: BTreeMap::new(),
            slowest_operations: Vec::new(),
            cache_performance: CachePerformance::default(),
            recommendations: Vec::new(),
        }
    }
}

/// Live view of the recorder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealTimeStats {
    pub active_timers: usize,
    pub buffered_samples: usize,
    pub operations_last_minute: usize,
    /// Average duration over the last five minutes
    pub average_response_time: f64,
    /// Failure percentage over the last five minutes
    pub error_rate: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Result of one buffer sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub expired_samples: usize,
    pub stale_timers: usize,
}
