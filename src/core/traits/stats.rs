//! Process-wide performance statistics collaborator

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Aggregated request statistics for the process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessStats {
    pub average_response_time_ms: f64,
    /// Failed operations as a percentage (0-100)
    pub error_rate: f64,
    pub total_operations: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PerformanceStatsSource: Send + Sync {
    /// Statistics over the trailing `window`
    async fn stats(&self, window: Duration) -> Result<ProcessStats>;
}
