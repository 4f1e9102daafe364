//! Initialization result and service status types

use crate::config::{Environment, InitializationConfig};
use crate::core::traits::CacheStats;
use crate::monitoring::health::HealthState;
use crate::monitoring::performance::RealTimeStats;
use serde::{Deserialize, Serialize};

/// Outcome of bringing the services up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitializationResult {
    /// True when no step produced an error
    pub success: bool,
    pub errors: Vec<String>,
    /// Non-fatal problems, such as a failed warm-up
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

/// Snapshot of the running services
#[derive(Debug, Clone, Serialize)]
pub struct ServicesStatus {
    pub initialized: bool,
    pub environment: Environment,
    pub health_monitoring: bool,
    pub performance_monitoring: bool,
    pub signal_handlers_registered: bool,
    pub panic_hook_installed: bool,
    /// Overall status from the latest health check
    pub health_status: HealthState,
    pub active_alerts: usize,
    pub performance: RealTimeStats,
    /// Absent when the cache could not be read
    pub cache: Option<CacheStats>,
    pub config: InitializationConfig,
}
