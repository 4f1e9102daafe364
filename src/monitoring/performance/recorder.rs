//! Timing recorder: open timers, the sample buffer and threshold logging

use super::background::start_sweep_task;
use super::bounded::BoundedPush;
use super::types::{Context, PerformanceSample, TimerHandle};
use crate::config::PerformanceConfig;
use crate::utils::current_timestamp_millis;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Records timing samples for reservation-path operations
///
/// Cloning is cheap and every clone shares the same buffers.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    /// Configuration
    pub(super) config: Arc<PerformanceConfig>,
    /// Completed samples, oldest first
    pub(super) samples: Arc<RwLock<VecDeque<PerformanceSample>>>,
    /// Open timers keyed by id
    pub(super) timers: Arc<Mutex<HashMap<String, TimerHandle>>>,
    /// Background sweep task
    pub(super) sweep_task: Arc<Mutex<Option<JoinHandle<()>>>>,
    /// Whether the sweep is running - using AtomicBool for lock-free access
    pub(super) active: Arc<AtomicBool>,
}

impl PerformanceMonitor {
    /// Create a new recorder
    pub fn new(config: PerformanceConfig) -> Self {
        Self {
            config: Arc::new(config),
            samples: Arc::new(RwLock::new(VecDeque::new())),
            timers: Arc::new(Mutex::new(HashMap::new())),
            sweep_task: Arc::new(Mutex::new(None)),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the periodic sweep of expired samples and stale timers
    pub fn start(&self) {
        if self.active.swap(true, Ordering::AcqRel) {
            debug!("Performance monitor already started");
            return;
        }

        debug!("Starting performance monitor");
        let handle = start_sweep_task(self.clone());
        *self.sweep_task.lock() = Some(handle);
    }

    /// Stop the sweep task. Recorded samples are kept.
    pub fn stop(&self) {
        debug!("Stopping performance monitor");
        self.active.store(false, Ordering::Release);
        if let Some(handle) = self.sweep_task.lock().take() {
            handle.abort();
        }
    }

    /// Check if the sweep task is running
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    /// Open a timer for `operation` and return its id
    pub fn start_timing(&self, operation: &str, context: Context) -> String {
        let mut timers = self.timers.lock();

        let mut id = generate_timer_id(operation);
        while timers.contains_key(&id) {
            id = generate_timer_id(operation);
        }

        timers.insert(
            id.clone(),
            TimerHandle {
                id: id.clone(),
                operation: operation.to_string(),
                start: Instant::now(),
                started_at: current_timestamp_millis(),
                context,
            },
        );

        id
    }

    /// Close the timer `timer_id` and record a sample
    ///
    /// Returns the measured duration in milliseconds, or 0 when the timer is
    /// unknown (already ended, swept, or never started).
    pub fn end_timing(
        &self,
        timer_id: &str,
        operation: &str,
        success: bool,
        error_type: Option<&str>,
        extra_context: Option<Context>,
    ) -> u64 {
        let Some(handle) = self.timers.lock().remove(timer_id) else {
            warn!(timer_id, operation, "Timer not found, sample dropped");
            return 0;
        };

        let duration_ms = handle.start.elapsed().as_millis() as u64;

        let mut context = handle.context;
        if let Some(extra) = extra_context {
            context.extend(extra);
        }

        let sample = PerformanceSample {
            operation: operation.to_string(),
            duration_ms,
            timestamp: current_timestamp_millis(),
            success,
            error_type: error_type.map(String::from),
            context,
        };

        self.record_metric(sample);
        duration_ms
    }

    /// Append a complete sample to the buffer
    pub fn record_metric(&self, sample: PerformanceSample) {
        self.check_threshold(&sample);

        let evicted = self
            .samples
            .write()
            .push_bounded(sample, self.config.max_samples);
        if evicted > 0 {
            debug!(evicted, "Sample buffer full, evicted oldest samples");
        }
    }

    /// Log samples that exceed their operation threshold
    fn check_threshold(&self, sample: &PerformanceSample) {
        let threshold = self.config.threshold_for(&sample.operation);

        if sample.duration_ms > threshold.saturating_mul(2) {
            error!(
                operation = %sample.operation,
                duration_ms = sample.duration_ms,
                threshold_ms = threshold,
                "Critical performance issue: operation took more than twice its threshold"
            );
        } else if sample.duration_ms > threshold {
            warn!(
                operation = %sample.operation,
                duration_ms = sample.duration_ms,
                threshold_ms = threshold,
                "Slow operation"
            );
        }
    }

    /// Number of open timers
    pub fn active_timer_count(&self) -> usize {
        self.timers.lock().len()
    }

    /// Number of buffered samples
    pub fn sample_count(&self) -> usize {
        self.samples.read().len()
    }

    /// Drop every sample and open timer
    pub fn clear_metrics(&self) {
        let samples = {
            let mut buffer = self.samples.write();
            let n = buffer.len();
            buffer.clear();
            n
        };
        let timers = {
            let mut open = self.timers.lock();
            let n = open.len();
            open.clear();
            n
        };
        info!(samples, timers, "Performance metrics cleared");
    }

    /// Log the configured thresholds
    pub fn log_thresholds(&self) {
        for (operation, threshold) in &self.config.thresholds {
            info!(operation = %operation, threshold_ms = threshold, "Performance threshold");
        }
    }
}

/// Timer id: operation, start time and a random suffix
fn generate_timer_id(operation: &str) -> String {
    format!(
        "{}_{}_{:08x}",
        operation,
        current_timestamp_millis(),
        rand::random::<u32>()
    )
}
