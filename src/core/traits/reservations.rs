//! Reservation monitoring collaborator

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reservation funnel metrics over a time window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationMetrics {
    pub total_reservations: u64,
    pub successful_reservations: u64,
    pub failed_reservations: u64,
    /// Failed attempts as a percentage of all attempts
    pub error_rate: f64,
    /// Completed reservations as a percentage of booking sessions
    pub conversion_rate: f64,
    pub average_processing_time_ms: f64,
    pub security_incidents: u64,
}

/// Error forwarded to the reservation error tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationErrorReport {
    /// Error category, e.g. `panic` or `ValidationError`
    pub error_type: String,
    pub message: String,
    /// Where the error was observed
    pub source: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl ReservationErrorReport {
    pub fn new(
        error_type: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            source: source.into(),
            timestamp: chrono::Utc::now(),
            details: serde_json::Value::Null,
        }
    }
}

/// Reservation subsystem monitoring
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationMetricsSource: Send + Sync {
    /// Metrics over the trailing `window`
    async fn reservation_metrics(&self, window: Duration) -> Result<ReservationMetrics>;

    /// Record a user behaviour event
    async fn track_user_behavior(&self, event: &str, data: serde_json::Value) -> Result<()>;

    /// Record an error affecting the reservation flow
    async fn track_reservation_error(&self, report: ReservationErrorReport) -> Result<()>;
}
