//! Configuration data models
//!
//! This module defines all configuration structures used by the monitoring layer.

pub mod health;
pub mod initialization;
pub mod logging;
pub mod performance;

// Re-export all configuration types
pub use health::*;
pub use initialization::*;
pub use logging::*;
pub use performance::*;

/// Default maximum number of retained performance samples
pub fn default_max_samples() -> usize {
    10_000
}

/// Default sample retention in hours
pub fn default_sample_retention_hours() -> u64 {
    24
}

/// Default age in minutes after which an open timer is considered stale
pub fn default_stale_timer_minutes() -> u64 {
    10
}

/// Default interval between buffer sweeps, in seconds
pub fn default_sweep_interval() -> u64 {
    300 // 5 minutes
}

/// Default health check interval in seconds
pub fn default_health_check_interval() -> u64 {
    60
}

/// Default window for system-wide metric aggregation, in seconds
pub fn default_metrics_window() -> u64 {
    300
}

/// Default window for reservation metrics, in seconds
pub fn default_reservation_window() -> u64 {
    3600 // 1 hour
}

/// Default size of the resolved alert history
pub fn default_alert_history_limit() -> usize {
    1000
}

pub fn default_true() -> bool {
    true
}
