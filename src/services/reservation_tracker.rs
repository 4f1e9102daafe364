//! Reservation tracking: attempts, behaviour events and errors

use crate::core::traits::{ReservationErrorReport, ReservationMetrics, ReservationMetricsSource};
use crate::monitoring::performance::BoundedPush;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Behaviour event counted as a loft view for the conversion rate
pub const LOFT_VIEW_EVENT: &str = "loft_view";
/// Error type counted as a security incident
pub const SECURITY_ERROR_TYPE: &str = "security";

const DEFAULT_MAX_EVENTS: usize = 10_000;

/// A completed reservation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationAttempt {
    pub loft_id: String,
    pub success: bool,
    pub processing_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// A tracked user behaviour event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub event: String,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct TrackerLog {
    attempts: VecDeque<ReservationAttempt>,
    behaviors: VecDeque<BehaviorEvent>,
    errors: VecDeque<ReservationErrorReport>,
}

/// In-process reservation metrics source
///
/// Each log keeps at most `max_events` entries, oldest evicted first.
#[derive(Debug, Clone)]
pub struct ReservationTracker {
    log: Arc<RwLock<TrackerLog>>,
    max_events: usize,
}

impl Default for ReservationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EVENTS)
    }
}

impl ReservationTracker {
    pub fn new(max_events: usize) -> Self {
        Self {
            log: Arc::new(RwLock::new(TrackerLog::default())),
            max_events,
        }
    }

    pub fn record_attempt(&self, loft_id: impl Into<String>, success: bool, processing_time_ms: u64) {
        self.record_attempt_at(loft_id, success, processing_time_ms, Utc::now());
    }

    /// Record an attempt with an explicit timestamp
    pub fn record_attempt_at(
        &self,
        loft_id: impl Into<String>,
        success: bool,
        processing_time_ms: u64,
        timestamp: DateTime<Utc>,
    ) {
        let attempt = ReservationAttempt {
            loft_id: loft_id.into(),
            success,
            processing_time_ms,
            timestamp,
        };
        self.log
            .write()
            .attempts
            .push_bounded(attempt, self.max_events);
    }

    /// Record a security incident, such as a tampered price or a replayed payment
    pub fn record_security_incident(&self, message: impl Into<String>, details: Value) {
        let mut report = ReservationErrorReport::new(SECURITY_ERROR_TYPE, message, "reservation_tracker");
        report.details = details;
        warn!(message = %report.message, "Reservation security incident");
        self.log.write().errors.push_bounded(report, self.max_events);
    }

    /// Errors tracked so far, oldest first
    pub fn errors(&self) -> Vec<ReservationErrorReport> {
        self.log.read().errors.iter().cloned().collect()
    }

    /// Behaviour events tracked so far, oldest first
    pub fn behaviors(&self) -> Vec<BehaviorEvent> {
        self.log.read().behaviors.iter().cloned().collect()
    }

    /// Metrics over the entries newer than `now - window`
    pub fn metrics_since(&self, window: Duration, now: DateTime<Utc>) -> ReservationMetrics {
        let cutoff = chrono::Duration::from_std(window)
            .ok()
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let log = self.log.read();

        let attempts: Vec<&ReservationAttempt> =
            log.attempts.iter().filter(|a| a.timestamp > cutoff).collect();
        let total = attempts.len() as u64;
        let successful = attempts.iter().filter(|a| a.success).count() as u64;
        let failed = total - successful;

        let views = log
            .behaviors
            .iter()
            .filter(|b| b.timestamp > cutoff && b.event == LOFT_VIEW_EVENT)
            .count() as u64;
        let security_incidents = log
            .errors
            .iter()
            .filter(|e| e.timestamp > cutoff && e.error_type == SECURITY_ERROR_TYPE)
            .count() as u64;

        let ratio = |part: u64, whole: u64| {
            if whole == 0 {
                0.0
            } else {
                part as f64 / whole as f64 * 100.0
            }
        };

        ReservationMetrics {
            total_reservations: total,
            successful_reservations: successful,
            failed_reservations: failed,
            error_rate: ratio(failed, total),
            // Without views there is nothing to convert
            conversion_rate: if views == 0 {
                100.0
            } else {
                ratio(successful, views).min(100.0)
            },
            average_processing_time_ms: if total == 0 {
                0.0
            } else {
                attempts.iter().map(|a| a.processing_time_ms).sum::<u64>() as f64 / total as f64
            },
            security_incidents,
        }
    }
}

#[async_trait]
impl ReservationMetricsSource for ReservationTracker {
    async fn reservation_metrics(&self, window: Duration) -> Result<ReservationMetrics> {
        Ok(self.metrics_since(window, Utc::now()))
    }

    async fn track_user_behavior(&self, event: &str, data: Value) -> Result<()> {
        debug!(event, "Tracking user behavior");
        let event = BehaviorEvent {
            event: event.to_string(),
            data,
            timestamp: Utc::now(),
        };
        self.log
            .write()
            .behaviors
            .push_bounded(event, self.max_events);
        Ok(())
    }

    async fn track_reservation_error(&self, report: ReservationErrorReport) -> Result<()> {
        warn!(
            error_type = %report.error_type,
            source = %report.source,
            "Reservation error: {}",
            report.message
        );
        self.log.write().errors.push_bounded(report, self.max_events);
        Ok(())
    }
}
