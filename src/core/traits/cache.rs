//! Cache statistics collaborator

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Snapshot of cache effectiveness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Hit rate as a percentage (0-100)
    pub hit_rate: f64,
    /// Lookups served since start
    pub total_requests: u64,
    /// Entries currently held
    pub cache_size: u64,
    /// Average lookup latency in milliseconds
    pub average_response_time_ms: f64,
}

/// Read access to a cache plus the maintenance operations the
/// initialization and shutdown paths need
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStatsSource: Send + Sync {
    /// Current cache statistics
    async fn cache_stats(&self) -> Result<CacheStats>;

    /// Drop every cached entry
    async fn invalidate_all_cache(&self) -> Result<()>;

    /// Preload the given lofts
    async fn warm_up_cache(&self, loft_ids: &[String]) -> Result<()>;
}
