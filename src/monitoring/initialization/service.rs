//! Service orchestrator: brings the monitoring services up and down

use super::signals::SignalSource;
use super::types::{InitializationResult, ServicesStatus};
use crate::config::{InitializationConfig, InitializationConfigUpdate, Validate};
use crate::core::traits::{CacheStatsSource, ReservationErrorReport, ReservationMetricsSource};
use crate::monitoring::health::{HealthState, SystemHealthMonitor};
use crate::monitoring::performance::{Context, PerformanceMonitor};
use crate::utils::error::{MonitorError, Result};
use crate::utils::panic_message;
use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, error, info, warn};

pub const ALREADY_INITIALIZED: &str = "Services already initialized";
const SELF_TEST_OPERATION: &str = "initialization_test";

/// Collaborators the orchestrator talks to directly
#[derive(Clone)]
pub struct ServiceDependencies {
    pub cache: Arc<dyn CacheStatsSource>,
    pub reservations: Arc<dyn ReservationMetricsSource>,
    pub signals: Arc<dyn SignalSource>,
}

/// Owns the lifecycle of the performance recorder and the health monitor
#[derive(Clone)]
pub struct PerformanceInitializationService {
    config: Arc<RwLock<InitializationConfig>>,
    performance: PerformanceMonitor,
    health: SystemHealthMonitor,
    deps: ServiceDependencies,
    initialized: Arc<AtomicBool>,
    signals_registered: Arc<AtomicBool>,
    panic_hook_installed: Arc<AtomicBool>,
    /// Serializes initialize and shutdown
    lifecycle: Arc<tokio::sync::Mutex<()>>,
    shutdown_complete: Arc<Notify>,
}

impl std::fmt::Debug for PerformanceInitializationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceInitializationService")
            .field("config", &*self.config.read())
            .field("initialized", &self.is_initialized())
            .field("performance", &self.performance)
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}

impl PerformanceInitializationService {
    pub fn new(
        config: InitializationConfig,
        performance: PerformanceMonitor,
        health: SystemHealthMonitor,
        deps: ServiceDependencies,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            performance,
            health,
            deps,
            initialized: Arc::new(AtomicBool::new(false)),
            signals_registered: Arc::new(AtomicBool::new(false)),
            panic_hook_installed: Arc::new(AtomicBool::new(false)),
            lifecycle: Arc::new(tokio::sync::Mutex::new(())),
            shutdown_complete: Arc::new(Notify::new()),
        }
    }

    pub fn performance(&self) -> &PerformanceMonitor {
        &self.performance
    }

    pub fn health(&self) -> &SystemHealthMonitor {
        &self.health
    }

    pub fn config(&self) -> InitializationConfig {
        self.config.read().clone()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Bring up every enabled service
    ///
    /// `overrides` are merged into the configuration first. Calling this
    /// again before [`shutdown`](Self::shutdown) does nothing and reports a
    /// warning.
    pub async fn initialize(&self, overrides: Option<InitializationConfigUpdate>) -> InitializationResult {
        let _lifecycle = self.lifecycle.lock().await;
        let start = Instant::now();

        if self.is_initialized() {
            warn!("{}", ALREADY_INITIALIZED);
            return InitializationResult {
                success: true,
                errors: Vec::new(),
                warnings: vec![ALREADY_INITIALIZED.to_string()],
                duration_ms: 0,
            };
        }

        if let Some(update) = overrides {
            if let Err(e) = self.merge_config(update) {
                return InitializationResult {
                    success: false,
                    errors: vec![e.to_string()],
                    warnings: Vec::new(),
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
        }

        let config = self.config();
        info!(environment = %config.environment, "Initializing performance services");

        let mut result = InitializationResult::default();

        if config.enable_caching {
            if let Err(e) = self.initialize_caching(&config, &mut result.warnings).await {
                error!("Cache initialization failed: {}", e);
                result.errors.push(format!("Cache initialization failed: {}", e));
            }
        }

        if config.enable_health_monitoring {
            self.initialize_health_monitoring(&config, &mut result.warnings)
                .await;
        }

        if config.enable_performance_monitoring {
            self.initialize_performance_monitoring().await;
        }

        if config.enable_reservation_monitoring {
            if let Err(e) = self.initialize_reservation_monitoring(&config).await {
                error!("Reservation monitoring initialization failed: {}", e);
                result
                    .errors
                    .push(format!("Reservation monitoring initialization failed: {}", e));
            }
        }

        if config.install_panic_hook {
            self.install_panic_hook();
        }
        if config.handle_signals {
            self.register_signal_handlers();
        }

        result.success = result.errors.is_empty();
        result.duration_ms = start.elapsed().as_millis() as u64;
        self.initialized.store(result.success, Ordering::Release);

        if result.success {
            info!(
                duration_ms = result.duration_ms,
                warnings = result.warnings.len(),
                "Performance services initialized"
            );
        } else {
            error!(errors = ?result.errors, "Performance services initialized with errors");
        }

        result
    }

    /// Cache smoke test, then best-effort warm-up
    async fn initialize_caching(
        &self,
        config: &InitializationConfig,
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        let stats = self.deps.cache.cache_stats().await?;
        debug!(
            hit_rate = stats.hit_rate,
            cache_size = stats.cache_size,
            "Cache reachable"
        );

        if !config.enable_cache_warmup {
            return Ok(());
        }
        if config.warmup_loft_ids.is_empty() {
            debug!("No lofts configured for cache warm-up");
            return Ok(());
        }

        match self.deps.cache.warm_up_cache(&config.warmup_loft_ids).await {
            Ok(()) => info!(lofts = config.warmup_loft_ids.len(), "Cache warmed up"),
            Err(e) => {
                warn!("Cache warm-up failed: {}", e);
                warnings.push(format!("Cache warm-up failed: {}", e));
            }
        }
        Ok(())
    }

    /// Start the interval and run one check right away
    async fn initialize_health_monitoring(
        &self,
        config: &InitializationConfig,
        warnings: &mut Vec<String>,
    ) {
        self.health
            .start_monitoring(config.health_check_interval());

        let status = self.health.perform_health_check().await;
        match status.status {
            HealthState::Critical => {
                let critical: Vec<&str> = status
                    .components
                    .iter()
                    .filter(|(_, c)| c.status == HealthState::Critical)
                    .map(|(name, _)| name.as_str())
                    .collect();
                warnings.push(format!(
                    "Initial health check reported critical status ({})",
                    critical.join(", ")
                ));
            }
            state => info!(status = %state, "Initial health check completed"),
        }
    }

    /// Start the recorder and time a trivial operation through it
    async fn initialize_performance_monitoring(&self) {
        self.performance.start();
        self.performance.log_thresholds();

        let timer = self
            .performance
            .start_timing(SELF_TEST_OPERATION, Context::new());
        tokio::task::yield_now().await;
        let duration_ms = self
            .performance
            .end_timing(&timer, SELF_TEST_OPERATION, true, None, None);
        debug!(duration_ms, "Performance self test recorded");
    }

    async fn initialize_reservation_monitoring(&self, config: &InitializationConfig) -> Result<()> {
        self.deps
            .reservations
            .track_user_behavior(
                "performance_monitoring_initialized",
                json!({
                    "environment": config.environment.to_string(),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }),
            )
            .await?;
        debug!("Reservation monitoring reachable");
        Ok(())
    }

    /// Shut down on every signal from the signal source; registered once
    ///
    /// The handler outlives a shutdown so a re-initialized service still
    /// reacts to the next signal.
    fn register_signal_handlers(&self) {
        if self.signals_registered.swap(true, Ordering::AcqRel) {
            debug!("Signal handlers already registered");
            return;
        }

        let service = self.clone();
        tokio::spawn(async move {
            loop {
                let signal = service.deps.signals.wait_for_shutdown().await;
                info!(signal = %signal, "Shutdown signal received");
                if let Err(e) = service.shutdown().await {
                    error!("Shutdown after {} failed: {}", signal, e);
                }
            }
        });
        debug!("Signal handlers registered");
    }

    /// Forward panics to the reservation error tracker; installed once
    fn install_panic_hook(&self) {
        if self.panic_hook_installed.swap(true, Ordering::AcqRel) {
            return;
        }

        let (sender, mut receiver) = mpsc::unbounded_channel::<ReservationErrorReport>();

        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let mut report =
                ReservationErrorReport::new("panic", panic_message(info.payload()), "panic_hook");
            if let Some(location) = info.location() {
                report.details = json!({ "location": location.to_string() });
            }
            // The receiver is gone once the runtime has shut down
            let _ = sender.send(report);
            previous(info);
        }));

        let reservations = self.deps.reservations.clone();
        tokio::spawn(async move {
            while let Some(report) = receiver.recv().await {
                if let Err(e) = reservations.track_reservation_error(report).await {
                    warn!("Failed to forward panic report: {}", e);
                }
            }
        });
        debug!("Panic hook installed");
    }

    /// Current state of every service
    pub async fn get_services_status(&self) -> ServicesStatus {
        let config = self.config();
        let health = self.health.get_health_status();

        let cache = if config.enable_caching {
            match self.deps.cache.cache_stats().await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    warn!("Failed to read cache stats: {}", e);
                    None
                }
            }
        } else {
            None
        };

        ServicesStatus {
            initialized: self.is_initialized(),
            environment: config.environment,
            health_monitoring: self.health.is_monitoring(),
            performance_monitoring: self.performance.is_active(),
            signal_handlers_registered: self.signals_registered.load(Ordering::Acquire),
            panic_hook_installed: self.panic_hook_installed.load(Ordering::Acquire),
            health_status: health.status,
            active_alerts: self.health.get_active_alerts().len(),
            performance: self.performance.get_real_time_stats(),
            cache,
            config,
        }
    }

    /// Stop every service and drop in-memory metrics
    ///
    /// Outside production the cache is invalidated as well.
    pub async fn shutdown(&self) -> Result<()> {
        let _lifecycle = self.lifecycle.lock().await;
        info!("Shutting down performance services");

        self.health.stop_monitoring();
        self.performance.stop();
        self.performance.clear_metrics();

        let config = self.config();
        let mut outcome = Ok(());
        if config.enable_caching && !config.environment.is_production() {
            match self.deps.cache.invalidate_all_cache().await {
                Ok(()) => info!("Cache invalidated"),
                Err(e) => {
                    warn!("Cache invalidation failed: {}", e);
                    outcome = Err(e);
                }
            }
        }

        self.initialized.store(false, Ordering::Release);
        self.shutdown_complete.notify_one();
        info!("Performance services shut down");
        outcome
    }

    /// Resolve once a shutdown has completed
    pub async fn wait_for_shutdown(&self) {
        self.shutdown_complete.notified().await;
    }

    /// Merge `update` into the configuration
    ///
    /// Health monitoring is restarted when its interval changes while
    /// running, and started or stopped when it is toggled on an initialized
    /// service.
    pub fn update_config(&self, update: InitializationConfigUpdate) -> Result<()> {
        let (previous, current) = self.merge_config(update)?;

        if !self.is_initialized() {
            return Ok(());
        }

        match (current.enable_health_monitoring, self.health.is_monitoring()) {
            (false, true) => self.health.stop_monitoring(),
            (true, false) => self.health.start_monitoring(current.health_check_interval()),
            (true, true)
                if previous.health_check_interval_secs != current.health_check_interval_secs =>
            {
                info!(
                    interval_secs = current.health_check_interval_secs,
                    "Restarting health monitoring with new interval"
                );
                self.health.start_monitoring(current.health_check_interval());
            }
            _ => {}
        }
        Ok(())
    }

    fn merge_config(
        &self,
        update: InitializationConfigUpdate,
    ) -> Result<(InitializationConfig, InitializationConfig)> {
        let mut config = self.config.write();
        let previous = config.clone();

        let mut merged = previous.clone();
        merged.apply(update);
        merged
            .validate()
            .map_err(|e| MonitorError::config(format!("Initialization config error: {}", e)))?;

        *config = merged.clone();
        debug!(config = ?merged, "Initialization config updated");
        Ok((previous, merged))
    }
}
