//! Loft document cache backed by moka

use crate::core::traits::{CacheStats, CacheStatsSource, RelationalStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const LOFTS_TABLE: &str = "lofts";

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoftCacheConfig {
    /// Maximum number of cached lofts
    pub max_entries: u64,
    /// Time to live of an entry
    pub ttl: Duration,
}

impl Default for LoftCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Atomic lookup counters for lock-free hot path updates
#[derive(Debug, Default)]
struct LookupCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    /// Total lookup time in microseconds
    lookup_micros: AtomicU64,
}

impl LookupCounters {
    fn record(&self, hit: bool, elapsed: Duration) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        self.lookup_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.lookup_micros.store(0, Ordering::Relaxed);
    }
}

/// Cache of loft rows keyed by loft id
#[derive(Clone)]
pub struct LoftCache {
    cache: Cache<String, Arc<Value>>,
    store: Arc<dyn RelationalStore>,
    counters: Arc<LookupCounters>,
}

impl std::fmt::Debug for LoftCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoftCache")
            .field("entries", &self.cache.entry_count())
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl LoftCache {
    pub fn new(store: Arc<dyn RelationalStore>, config: LoftCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();

        Self {
            cache,
            store,
            counters: Arc::new(LookupCounters::default()),
        }
    }

    /// Cached loft, counting the lookup as a hit or a miss
    pub async fn get(&self, loft_id: &str) -> Option<Arc<Value>> {
        let start = Instant::now();
        let value = self.cache.get(loft_id).await;
        self.counters.record(value.is_some(), start.elapsed());
        value
    }

    pub async fn insert(&self, loft_id: impl Into<String>, loft: Value) {
        self.cache.insert(loft_id.into(), Arc::new(loft)).await;
    }

    /// Cached loft, loading it from the store on a miss
    pub async fn get_or_load(&self, loft_id: &str) -> Result<Option<Arc<Value>>> {
        if let Some(loft) = self.get(loft_id).await {
            return Ok(Some(loft));
        }

        let wanted = HashSet::from([loft_id]);
        let mut loaded = self.load(&wanted).await?;
        Ok(loaded.pop())
    }

    /// Load the given lofts from the store into the cache
    async fn load(&self, loft_ids: &HashSet<&str>) -> Result<Vec<Arc<Value>>> {
        let rows = self.store.select(LOFTS_TABLE, "*", usize::MAX).await?;

        let mut loaded = Vec::new();
        for row in rows {
            let Some(id) = row.get("id").and_then(Value::as_str).map(String::from) else {
                continue;
            };
            if loft_ids.contains(id.as_str()) {
                let loft = Arc::new(row);
                self.cache.insert(id, loft.clone()).await;
                loaded.push(loft);
            }
        }
        Ok(loaded)
    }
}

#[async_trait]
impl CacheStatsSource for LoftCache {
    async fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.run_pending_tasks().await;

        let hits = self.counters.hits.load(Ordering::Relaxed);
        let misses = self.counters.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let micros = self.counters.lookup_micros.load(Ordering::Relaxed);

        let (hit_rate, average_response_time_ms) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                hits as f64 / total as f64 * 100.0,
                micros as f64 / total as f64 / 1000.0,
            )
        };

        Ok(CacheStats {
            hit_rate,
            total_requests: total,
            cache_size: self.cache.entry_count(),
            average_response_time_ms,
        })
    }

    async fn invalidate_all_cache(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        self.counters.reset();
        info!("Loft cache invalidated");
        Ok(())
    }

    async fn warm_up_cache(&self, loft_ids: &[String]) -> Result<()> {
        let wanted: HashSet<&str> = loft_ids.iter().map(String::as_str).collect();
        let loaded = self.load(&wanted).await?;

        if loaded.len() < wanted.len() {
            debug!(
                requested = wanted.len(),
                loaded = loaded.len(),
                "Some lofts were not found during warm-up"
            );
        }
        info!(lofts = loaded.len(), "Loft cache warmed up");
        Ok(())
    }
}
