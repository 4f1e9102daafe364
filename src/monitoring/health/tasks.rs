//! Background health check task

use super::monitor::SystemHealthMonitor;
use crate::utils::format_duration;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, info};

impl SystemHealthMonitor {
    /// Run a check cycle every `interval`
    ///
    /// The first cycle runs one interval after the call. Calling this while
    /// monitoring restarts the task with the new interval.
    pub fn start_monitoring(&self, interval: Duration) {
        let mut task = self.task.lock();
        if let Some(previous) = task.take() {
            debug!("Restarting health monitoring");
            previous.abort();
        }

        self.active.store(true, Ordering::Release);
        let monitor = self.clone();

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

            loop {
                ticker.tick().await;

                if !monitor.is_monitoring() {
                    break;
                }

                monitor.perform_health_check().await;
            }
        }));

        info!(
            interval = %format_duration(interval.as_millis() as u64),
            "Health monitoring started"
        );
    }

    /// Stop the background task
    pub fn stop_monitoring(&self) {
        self.active.store(false, Ordering::Release);
        if let Some(task) = self.task.lock().take() {
            task.abort();
            info!("Health monitoring stopped");
        }
    }

    /// Check if the background task is running
    #[inline]
    pub fn is_monitoring(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
