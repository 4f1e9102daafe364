//! Background sweep of expired samples and stale timers

use super::recorder::PerformanceMonitor;
use super::types::SweepOutcome;
use crate::utils::current_timestamp_millis;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn the periodic sweep. The first sweep runs one interval after start.
pub(super) fn start_sweep_task(monitor: PerformanceMonitor) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = monitor.config.sweep_interval();
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

        loop {
            interval.tick().await;

            if !monitor.is_active() {
                break;
            }

            monitor.sweep(current_timestamp_millis());
        }
    })
}

impl PerformanceMonitor {
    /// Drop samples older than the retention window and timers open longer
    /// than the stale age, measured against `now_ms`
    pub fn sweep(&self, now_ms: u64) -> SweepOutcome {
        let retention_ms = u64::try_from(self.config.retention().as_millis()).unwrap_or(u64::MAX);
        let stale_ms = u64::try_from(self.config.stale_timer_age().as_millis()).unwrap_or(u64::MAX);
        let sample_cutoff = now_ms.saturating_sub(retention_ms);
        let timer_cutoff = now_ms.saturating_sub(stale_ms);

        let expired_samples = {
            let mut samples = self.samples.write();
            let before = samples.len();
            samples.retain(|s| s.timestamp >= sample_cutoff);
            before - samples.len()
        };

        let stale_timers = {
            let mut timers = self.timers.lock();
            let before = timers.len();
            timers.retain(|_, handle| {
                let stale = handle.started_at < timer_cutoff;
                if stale {
                    warn!(
                        timer_id = %handle.id,
                        operation = %handle.operation,
                        age_ms = now_ms.saturating_sub(handle.started_at),
                        "Removing stale timer"
                    );
                }
                !stale
            });
            before - timers.len()
        };

        debug!(expired_samples, stale_timers, "Performance buffer sweep complete");

        SweepOutcome {
            expired_samples,
            stale_timers,
        }
    }
}
