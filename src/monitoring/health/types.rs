//! Health monitoring types and data structures

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DATABASE_COMPONENT: &str = "database";
pub const CACHE_COMPONENT: &str = "cache";
pub const RESERVATIONS_COMPONENT: &str = "reservations";
pub const CONSISTENCY_COMPONENT: &str = "data_consistency";

/// Status of a component or of the whole system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Warning,
    Critical,
    #[default]
    Unknown,
}

impl HealthState {
    /// Combine component states: any critical is critical, otherwise any
    /// warning is warning, otherwise healthy only when every state is healthy.
    /// An empty set is unknown.
    pub fn overall<I>(states: I) -> HealthState
    where
        I: IntoIterator<Item = HealthState>,
    {
        let mut any = false;
        let mut all_healthy = true;
        let mut warning = false;

        for state in states {
            any = true;
            match state {
                HealthState::Critical => return HealthState::Critical,
                HealthState::Warning => warning = true,
                HealthState::Healthy => {}
                HealthState::Unknown => all_healthy = false,
            }
        }

        if warning {
            HealthState::Warning
        } else if any && all_healthy {
            HealthState::Healthy
        } else {
            HealthState::Unknown
        }
    }

    /// Status from a probe's error count and response time
    pub fn from_probe(error_count: u32, response_time_ms: f64, warning_ms: f64, critical_ms: f64) -> Self {
        if error_count > 0 || response_time_ms > critical_ms {
            HealthState::Critical
        } else if response_time_ms > warning_ms {
            HealthState::Warning
        } else {
            HealthState::Healthy
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Warning => write!(f, "warning"),
            HealthState::Critical => write!(f, "critical"),
            HealthState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Latest health snapshot of a single component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthState,
    pub last_check: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    pub error_count: u32,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<serde_json::Map<String, Value>>,
}

impl ComponentHealth {
    pub fn new(status: HealthState, details: impl Into<String>) -> Self {
        Self {
            status,
            last_check: chrono::Utc::now(),
            response_time_ms: None,
            error_count: 0,
            details: details.into(),
            metrics: None,
        }
    }

    /// Component whose check could not complete
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error_count: 1,
            ..Self::new(HealthState::Critical, message)
        }
    }

    pub fn with_response_time(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = Some(response_time_ms);
        self
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metrics
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Numeric metric recorded by the check, if any
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.as_ref()?.get(key)?.as_f64()
    }
}

/// Alert category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Performance,
    Error,
    Consistency,
    Security,
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertType::Performance => write!(f, "performance"),
            AlertType::Error => write!(f, "error"),
            AlertType::Consistency => write!(f, "consistency"),
            AlertType::Security => write!(f, "security"),
        }
    }
}

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "INFO"),
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Error => write!(f, "ERROR"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Alert raised when a threshold is crossed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAlert {
    /// `type_component_createdMillis`
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub component: String,
    /// Creation time
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Most recent time the condition was observed
    pub last_seen: chrono::DateTime<chrono::Utc>,
    /// Number of cycles in which the condition was observed
    pub occurrences: u32,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Alert to raise; deduplicated against open alerts by type, component and rule
#[derive(Debug, Clone)]
pub struct AlertRequest {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub component: String,
    pub message: String,
    /// Distinguishes several conditions on the same type and component
    pub rule: Option<String>,
    pub details: Option<Value>,
}

impl AlertRequest {
    pub fn new(
        alert_type: AlertType,
        severity: AlertSeverity,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            alert_type,
            severity,
            component: component.into(),
            message: message.into(),
            rule: None,
            details: None,
        }
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Deduplication key
    pub fn key(&self) -> String {
        alert_key(self.alert_type, &self.component, self.rule.as_deref())
    }
}

pub(super) fn alert_key(alert_type: AlertType, component: &str, rule: Option<&str>) -> String {
    match rule {
        Some(rule) => format!("{}:{}:{}", alert_type, component, rule),
        None => format!("{}:{}", alert_type, component),
    }
}

/// System-wide metrics recomputed every cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub average_response_time_ms: f64,
    /// Failed operations as a percentage
    pub error_rate: f64,
    /// Cache hit rate, absent when the cache could not be read
    pub cache_hit_rate: Option<f64>,
    /// Used memory as a percentage of total memory
    pub memory_usage_percent: f64,
    pub total_operations: u64,
    pub uptime_seconds: u64,
}

/// Aggregate health of the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealthStatus {
    pub status: HealthState,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub components: BTreeMap<String, ComponentHealth>,
    pub metrics: SystemMetrics,
    /// Unresolved alerts at the end of the cycle
    pub alerts: Vec<HealthAlert>,
    pub recommendations: Vec<String>,
}

impl Default for SystemHealthStatus {
    fn default() -> Self {
        Self {
            status: HealthState::Unknown,
            timestamp: chrono::Utc::now(),
            components: BTreeMap::new(),
            metrics: SystemMetrics::default(),
            alerts: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

/// Outcome of an optional check whose backing capability may be absent
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityProbe<T> {
    /// The capability exists and answered
    Supported(T),
    /// The capability does not exist on this deployment
    Unsupported,
    /// The capability exists but the call failed
    Failed(String),
}
