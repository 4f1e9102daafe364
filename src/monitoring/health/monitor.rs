//! System health monitor: the check cycle, alert evaluation and snapshot state

use super::alerts::{AlertStore, Raised};
use super::recommendations::generate_recommendations;
use super::rules::{AlertRule, default_rules};
use super::types::{
    AlertRequest, AlertSeverity, AlertType, CACHE_COMPONENT, CONSISTENCY_COMPONENT,
    ComponentHealth, DATABASE_COMPONENT, HealthAlert, HealthState, RESERVATIONS_COMPONENT,
    SystemHealthStatus, SystemMetrics, alert_key,
};
use crate::config::HealthConfig;
use crate::core::traits::{
    CacheStatsSource, MemoryProbe, PerformanceStatsSource, RelationalStore,
    ReservationMetricsSource,
};
use crate::utils::error::{MonitorError, Result};
use crate::utils::panic_message;
use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub(super) const MONITOR_COMPONENT: &str = "health_monitor";
const CYCLE_RULE: &str = "cycle_failure";
const COMPONENT_RULE: &str = "component_status";
const BUILTIN_COMPONENTS: [&str; 4] = [
    DATABASE_COMPONENT,
    CACHE_COMPONENT,
    RESERVATIONS_COMPONENT,
    CONSISTENCY_COMPONENT,
];

/// Collaborators read by the health checks
#[derive(Clone)]
pub struct HealthDependencies {
    pub store: Arc<dyn RelationalStore>,
    pub cache: Arc<dyn CacheStatsSource>,
    pub reservations: Arc<dyn ReservationMetricsSource>,
    pub performance: Arc<dyn PerformanceStatsSource>,
    pub memory: Arc<dyn MemoryProbe>,
}

/// Additional named component check
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<ComponentHealth>;
}

#[async_trait]
impl<F, Fut> HealthCheck for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<ComponentHealth>> + Send + 'static,
{
    async fn check(&self) -> Result<ComponentHealth> {
        (self)().await
    }
}

/// Polls the platform's components, keeps the latest snapshot and the alert set
///
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct SystemHealthMonitor {
    pub(super) config: Arc<HealthConfig>,
    pub(super) deps: HealthDependencies,
    pub(super) rules: Arc<Vec<AlertRule>>,
    /// Snapshot produced by the latest cycle
    pub(super) state: Arc<RwLock<SystemHealthStatus>>,
    pub(super) alerts: Arc<RwLock<AlertStore>>,
    pub(super) custom_checks: Arc<RwLock<BTreeMap<String, Arc<dyn HealthCheck>>>>,
    /// Interval task
    pub(super) task: Arc<Mutex<Option<JoinHandle<()>>>>,
    pub(super) active: Arc<AtomicBool>,
    pub(super) started_at: Instant,
}

impl std::fmt::Debug for SystemHealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemHealthMonitor")
            .field("config", &self.config)
            .field("status", &self.state.read().status)
            .field("custom_checks", &self.custom_checks.read().keys().collect::<Vec<_>>())
            .field("monitoring", &self.is_monitoring())
            .finish_non_exhaustive()
    }
}

impl SystemHealthMonitor {
    pub fn new(config: HealthConfig, deps: HealthDependencies) -> Self {
        let rules = default_rules(&config.alerts);
        let history_limit = config.alerts.history_limit;

        Self {
            config: Arc::new(config),
            deps,
            rules: Arc::new(rules),
            state: Arc::new(RwLock::new(SystemHealthStatus::default())),
            alerts: Arc::new(RwLock::new(AlertStore::new(history_limit))),
            custom_checks: Arc::new(RwLock::new(BTreeMap::new())),
            task: Arc::new(Mutex::new(None)),
            active: Arc::new(AtomicBool::new(false)),
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Run one full check cycle and return the new snapshot
    ///
    /// Never fails: a component whose check errors or panics is reported
    /// `critical`, and a failure of the cycle itself marks the whole system
    /// `critical` and raises a dedicated alert.
    pub async fn perform_health_check(&self) -> SystemHealthStatus {
        let start = Instant::now();

        let status = match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => self.record_cycle_failure(&e.to_string()),
            Err(panic) => self.record_cycle_failure(&panic_message(panic.as_ref())),
        };

        info!(
            status = %status.status,
            components = status.components.len(),
            active_alerts = status.alerts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Health check completed"
        );
        status
    }

    async fn run_cycle(&self) -> Result<SystemHealthStatus> {
        let custom_checks: Vec<(String, Arc<dyn HealthCheck>)> = self
            .custom_checks
            .read()
            .iter()
            .map(|(name, check)| (name.clone(), check.clone()))
            .collect();

        let (database, cache, reservations, consistency, custom) = futures::join!(
            settle(DATABASE_COMPONENT, self.check_database()),
            settle(CACHE_COMPONENT, self.check_cache()),
            settle(RESERVATIONS_COMPONENT, self.check_reservations()),
            settle(CONSISTENCY_COMPONENT, self.check_data_consistency()),
            futures::future::join_all(custom_checks.iter().map(
                |(name, check)| async move { (name.clone(), settle(name, check.check()).await) },
            )),
        );

        let mut components = BTreeMap::new();
        components.insert(DATABASE_COMPONENT.to_string(), database);
        components.insert(CACHE_COMPONENT.to_string(), cache);
        components.insert(RESERVATIONS_COMPONENT.to_string(), reservations);
        components.insert(CONSISTENCY_COMPONENT.to_string(), consistency);
        components.extend(custom);

        let metrics = self.collect_system_metrics(&components).await?;

        let alerts = {
            let mut store = self.alerts.write();
            self.evaluate_metric_rules(&mut store, &metrics);
            self.evaluate_component_alerts(&mut store, &components);
            if let Some(resolved) =
                store.resolve_key(&alert_key(AlertType::Error, MONITOR_COMPONENT, Some(CYCLE_RULE)))
            {
                info!(alert_id = %resolved.id, "Health check system recovered");
            }
            store.active()
        };

        let status = HealthState::overall(components.values().map(|c| c.status));
        let recommendations = generate_recommendations(&components, &metrics, &self.config.alerts);

        let snapshot = SystemHealthStatus {
            status,
            timestamp: chrono::Utc::now(),
            components,
            metrics,
            alerts,
            recommendations,
        };
        *self.state.write() = snapshot.clone();

        Ok(snapshot)
    }

    /// System-wide metrics from the performance source, the cache check and the memory probe
    async fn collect_system_metrics(
        &self,
        components: &BTreeMap<String, ComponentHealth>,
    ) -> Result<SystemMetrics> {
        let stats = self
            .deps
            .performance
            .stats(self.config.metrics_window())
            .await
            .map_err(|e| MonitorError::health_check(format!("Failed to collect system metrics: {}", e)))?;

        Ok(SystemMetrics {
            average_response_time_ms: stats.average_response_time_ms,
            error_rate: stats.error_rate,
            cache_hit_rate: components
                .get(CACHE_COMPONENT)
                .filter(|cache| cache.metric("total_requests").is_some_and(|n| n > 0.0))
                .and_then(|cache| cache.metric("hit_rate")),
            memory_usage_percent: self.deps.memory.memory_usage_percent(),
            total_operations: stats.total_operations,
            uptime_seconds: self.started_at.elapsed().as_secs(),
        })
    }

    fn evaluate_metric_rules(&self, store: &mut AlertStore, metrics: &SystemMetrics) {
        for rule in self.rules.iter() {
            let key = alert_key(rule.alert_type, rule.component, Some(rule.id));

            // No reading means nothing to judge
            let Some(value) = rule.metric.value(metrics) else {
                if let Some(resolved) = store.resolve_key(&key) {
                    info!(alert_id = %resolved.id, rule = rule.id, "Alert metric unavailable, resolving");
                }
                continue;
            };

            match rule.evaluate(value) {
                Some(severity) => {
                    let request =
                        AlertRequest::new(rule.alert_type, severity, rule.component, rule.message(value, severity))
                            .with_rule(rule.id)
                            .with_details(serde_json::json!({
                                "value": value,
                                "warning": rule.thresholds.warning,
                                "critical": rule.thresholds.critical,
                            }));
                    log_raised(&store.raise(request));
                }
                None => {
                    if let Some(resolved) = store.resolve_key(&key) {
                        info!(alert_id = %resolved.id, rule = rule.id, value, "Alert condition cleared");
                    }
                }
            }
        }
    }

    fn evaluate_component_alerts(
        &self,
        store: &mut AlertStore,
        components: &BTreeMap<String, ComponentHealth>,
    ) {
        for (name, health) in components {
            let target = (health.status == HealthState::Critical).then(|| component_alert_type(name, health));

            for alert_type in [
                AlertType::Performance,
                AlertType::Error,
                AlertType::Consistency,
                AlertType::Security,
            ] {
                if Some(alert_type) == target {
                    continue;
                }
                if let Some(resolved) = store.resolve_key(&alert_key(alert_type, name, Some(COMPONENT_RULE))) {
                    info!(alert_id = %resolved.id, component = %name, "Component recovered");
                }
            }

            if let Some(alert_type) = target {
                let request = AlertRequest::new(
                    alert_type,
                    AlertSeverity::Critical,
                    name.clone(),
                    format!("Component {} is critical: {}", name, health.details),
                )
                .with_rule(COMPONENT_RULE)
                .with_details(serde_json::json!({
                    "error_count": health.error_count,
                    "response_time_ms": health.response_time_ms,
                }));
                log_raised(&store.raise(request));
            }
        }
    }

    fn record_cycle_failure(&self, message: &str) -> SystemHealthStatus {
        error!(error = message, "Health check system failure");

        let alerts = {
            let mut store = self.alerts.write();
            let request = AlertRequest::new(
                AlertType::Error,
                AlertSeverity::Critical,
                MONITOR_COMPONENT,
                format!("Health check system failure: {}", message),
            )
            .with_rule(CYCLE_RULE);
            log_raised(&store.raise(request));
            store.active()
        };

        let mut state = self.state.write();
        state.status = HealthState::Critical;
        state.timestamp = chrono::Utc::now();
        state.alerts = alerts;
        state.recommendations = vec![format!(
            "Health checks could not complete ({}); verify the monitoring collaborators",
            message
        )];
        state.clone()
    }

    /// Snapshot from the latest cycle
    pub fn get_health_status(&self) -> SystemHealthStatus {
        self.state.read().clone()
    }

    /// Latest health of a single component
    pub fn get_component_health(&self, name: &str) -> Option<ComponentHealth> {
        self.state.read().components.get(name).cloned()
    }

    /// Unresolved alerts, oldest first
    pub fn get_active_alerts(&self) -> Vec<HealthAlert> {
        self.alerts.read().active()
    }

    /// Resolved alerts, oldest first
    pub fn get_alert_history(&self) -> Vec<HealthAlert> {
        self.alerts.read().history()
    }

    /// Raise an alert, or refresh the open alert with the same key
    pub fn add_alert(&self, request: AlertRequest) -> HealthAlert {
        let raised = self.alerts.write().raise(request);
        log_raised(&raised);
        match raised {
            Raised::New(alert) | Raised::Repeated(alert) => alert,
        }
    }

    /// Whether an open alert exists for `request`'s key
    pub fn has_active_alert(&self, request: &AlertRequest) -> bool {
        self.alerts.read().is_active(&request.key())
    }

    /// Resolve an open alert by id; returns false when no open alert has that id
    pub fn resolve_alert(&self, alert_id: &str) -> bool {
        match self.alerts.write().resolve_id(alert_id) {
            Some(alert) => {
                info!(alert_id, component = %alert.component, "Alert resolved");
                true
            }
            None => {
                debug!(alert_id, "No open alert to resolve");
                false
            }
        }
    }

    /// Register an extra component check run in every cycle
    pub fn add_custom_check(&self, name: impl Into<String>, check: Arc<dyn HealthCheck>) -> Result<()> {
        let name = name.into();
        if BUILTIN_COMPONENTS.contains(&name.as_str()) {
            return Err(MonitorError::health_check(format!(
                "Component name '{}' is reserved",
                name
            )));
        }

        if self.custom_checks.write().insert(name.clone(), check).is_some() {
            warn!(component = %name, "Replaced existing custom health check");
        } else {
            info!(component = %name, "Custom health check registered");
        }
        Ok(())
    }
}

/// Await a check, mapping errors and panics to a critical component
async fn settle<F>(component: &str, check: F) -> ComponentHealth
where
    F: Future<Output = Result<ComponentHealth>>,
{
    match AssertUnwindSafe(check).catch_unwind().await {
        Ok(Ok(health)) => health,
        Ok(Err(e)) => {
            warn!(component, error = %e, "Health check failed");
            ComponentHealth::failed(format!("Health check failed: {}", e))
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(component, error = %message, "Health check panicked");
            ComponentHealth::failed(format!("Health check panicked: {}", message))
        }
    }
}

fn component_alert_type(name: &str, health: &ComponentHealth) -> AlertType {
    match name {
        CONSISTENCY_COMPONENT => AlertType::Consistency,
        RESERVATIONS_COMPONENT
            if health.metric("security_incidents").unwrap_or(0.0) > 0.0 =>
        {
            AlertType::Security
        }
        _ => AlertType::Error,
    }
}

fn log_raised(raised: &Raised) {
    match raised {
        Raised::New(alert) => match alert.severity {
            AlertSeverity::Critical | AlertSeverity::Error => error!(
                alert_id = %alert.id,
                component = %alert.component,
                severity = %alert.severity,
                "{}",
                alert.message
            ),
            AlertSeverity::Warning => warn!(
                alert_id = %alert.id,
                component = %alert.component,
                "{}",
                alert.message
            ),
            AlertSeverity::Info => info!(
                alert_id = %alert.id,
                component = %alert.component,
                "{}",
                alert.message
            ),
        },
        Raised::Repeated(alert) => debug!(
            alert_id = %alert.id,
            occurrences = alert.occurrences,
            "Alert condition persists"
        ),
    }
}
