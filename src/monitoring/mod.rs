//! Monitoring for the loft booking platform
//!
//! This module provides performance recording and reporting, system health
//! checks with alerting, and the orchestrator that wires them together.

pub mod health;
pub mod initialization;
pub mod performance;

mod system;

#[cfg(test)]
pub(crate) mod test_support;

pub use health::{
    AlertRequest, AlertSeverity, AlertType, ComponentHealth, HealthAlert, HealthCheck,
    HealthDependencies, HealthState, SystemHealthMonitor, SystemHealthStatus, SystemMetrics,
};
pub use initialization::{
    ChannelSignalSource, InitializationResult, OsSignalSource, PerformanceInitializationService,
    ServiceDependencies, ServicesStatus, SignalSource, SignalTrigger,
};
pub use performance::{PerformanceMonitor, PerformanceReport, PerformanceSample, RealTimeStats};
pub use system::SystemMemoryProbe;
