//! Common test utilities for loft-monitor
//!
//! Every factory wires real adapters, not mocks:
//! - `fixtures` seeds an in-memory store with lofts and reservations
//! - `TestMonitor` builds a monitor driven by a channel signal source

pub mod fixtures;

pub use fixtures::{LOFT_IDS, seeded_store};

use loft_monitor::config::{Environment, ThresholdPair};
use loft_monitor::core::traits::CacheStatsSource;
use loft_monitor::{ChannelSignalSource, Config, InMemoryStore, LoftMonitor, SignalTrigger};
use std::sync::Arc;

/// Configuration that keeps tests independent of the host
///
/// Memory alerts are disabled since the probe reads real host memory,
/// signal handlers and the panic hook stay off, and periodic checks are
/// far enough apart that only explicit checks run.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.health.alerts.memory_usage = ThresholdPair::new(100.0, 100.0);
    config.initialization.environment = Environment::Test;
    config.initialization.warmup_loft_ids = LOFT_IDS[..2].iter().map(|s| s.to_string()).collect();
    config.initialization.health_check_interval_secs = 3600;
    config.initialization.install_panic_hook = false;
    config.initialization.handle_signals = false;
    config
}

/// Monitor over a store plus the trigger of its signal source
pub struct TestMonitor {
    pub monitor: LoftMonitor,
    pub signals: SignalTrigger,
}

impl TestMonitor {
    pub fn new(store: InMemoryStore) -> Self {
        Self::with_config(store, test_config())
    }

    pub fn with_config(store: InMemoryStore, config: Config) -> Self {
        let (source, signals) = ChannelSignalSource::new();
        let monitor = LoftMonitor::with_store(config, store, Arc::new(source));
        Self { monitor, signals }
    }

    /// Warm the cache and read every warmed loft so the hit rate is 100%
    pub async fn prime_cache(&self) {
        let ids: Vec<String> = LOFT_IDS.iter().map(|s| s.to_string()).collect();
        self.monitor.cache().warm_up_cache(&ids).await.unwrap();
        for id in LOFT_IDS {
            assert!(self.monitor.cache().get(id).await.is_some(), "{} not cached", id);
        }
    }
}

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
