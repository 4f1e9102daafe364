//! System health monitoring
//!
//! Checks the database, cache, reservation subsystem and data consistency
//! concurrently, derives an overall status, evaluates alert rules and keeps
//! the latest snapshot for callers.

mod alerts;
mod components;
mod monitor;
mod recommendations;
mod rules;
mod tasks;
mod types;


pub use monitor::{HealthCheck, HealthDependencies, SystemHealthMonitor};
pub use rules::{AlertRule, ComparisonOperator, MetricKind, default_rules};
pub use types::{
    AlertRequest, AlertSeverity, AlertType, CACHE_COMPONENT, CONSISTENCY_COMPONENT,
    CapabilityProbe, ComponentHealth, DATABASE_COMPONENT, HealthAlert, HealthState,
    RESERVATIONS_COMPONENT, SystemHealthStatus, SystemMetrics,
};
