//! # Loft Monitor
//!
//! Performance and health monitoring for the loft booking platform.
//!
//! ## Features
//!
//! - **Timing**: named timers and measuring wrappers around reservation-path operations
//! - **Reports**: windowed percentiles, per-operation breakdowns and recommendations
//! - **Health checks**: database, cache, reservation and consistency probes with alerting
//! - **Lifecycle**: ordered start-up, warm-up, signal handling and shutdown
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loft_monitor::{Config, LoftMonitor, OsSignalSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/monitor.yaml").await?;
//!     let monitor = LoftMonitor::new(config, Arc::new(OsSignalSource));
//!     monitor.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use monitoring::{
    ChannelSignalSource, HealthState, InitializationResult, OsSignalSource,
    PerformanceInitializationService, PerformanceMonitor, SignalSource, SignalTrigger,
    SystemHealthMonitor, SystemMemoryProbe,
};
pub use services::ReservationTracker;
pub use storage::{InMemoryStore, LoftCache, LoftCacheConfig};
pub use utils::error::{MonitorError, Result};

use monitoring::{HealthDependencies, ServiceDependencies};
use std::sync::Arc;
use tracing::{info, warn};

/// Monitoring stack wired to the in-process store, cache and reservation tracker
#[derive(Debug, Clone)]
pub struct LoftMonitor {
    config: Config,
    store: InMemoryStore,
    cache: LoftCache,
    tracker: ReservationTracker,
    service: PerformanceInitializationService,
}

impl LoftMonitor {
    /// Create a monitor over an empty store
    pub fn new(config: Config, signals: Arc<dyn SignalSource>) -> Self {
        Self::with_store(config, InMemoryStore::new(), signals)
    }

    /// Create a monitor over `store`
    pub fn with_store(config: Config, store: InMemoryStore, signals: Arc<dyn SignalSource>) -> Self {
        info!("Creating loft monitor");

        let store_handle: Arc<InMemoryStore> = Arc::new(store.clone());
        let cache = LoftCache::new(store_handle.clone(), LoftCacheConfig::default());
        let tracker = ReservationTracker::default();
        let performance = PerformanceMonitor::new(config.performance.clone());

        let health = SystemHealthMonitor::new(
            config.health.clone(),
            HealthDependencies {
                store: store_handle,
                cache: Arc::new(cache.clone()),
                reservations: Arc::new(tracker.clone()),
                performance: Arc::new(performance.clone()),
                memory: Arc::new(SystemMemoryProbe::new()),
            },
        );

        let service = PerformanceInitializationService::new(
            config.initialization.clone(),
            performance,
            health,
            ServiceDependencies {
                cache: Arc::new(cache.clone()),
                reservations: Arc::new(tracker.clone()),
                signals,
            },
        );

        Self {
            config,
            store,
            cache,
            tracker,
            service,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub fn cache(&self) -> &LoftCache {
        &self.cache
    }

    pub fn tracker(&self) -> &ReservationTracker {
        &self.tracker
    }

    pub fn service(&self) -> &PerformanceInitializationService {
        &self.service
    }

    pub fn performance(&self) -> &PerformanceMonitor {
        self.service.performance()
    }

    pub fn health(&self) -> &SystemHealthMonitor {
        self.service.health()
    }

    /// Initialize the services and wait until a shutdown completes
    pub async fn run(&self) -> Result<()> {
        let result = self.service.initialize(None).await;
        for warning in &result.warnings {
            warn!("{}", warning);
        }
        if !result.success {
            return Err(MonitorError::initialization(result.errors.join("; ")));
        }

        info!(
            duration_ms = result.duration_ms,
            "Loft monitor running, waiting for shutdown"
        );
        self.service.wait_for_shutdown().await;
        Ok(())
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time in seconds since the Unix epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build information of this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info() {
        let info = build_info();
        assert!(!info.version.is_empty());
        assert_eq!(info.version, VERSION);
        assert!(!info.git_hash.is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "loft-monitor");
        assert_eq!(DESCRIPTION, env!("CARGO_PKG_DESCRIPTION"));
    }
}
