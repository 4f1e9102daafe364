//! Windowed performance reports

use super::helpers::{calculate_average, nearest_rank_percentile, percentage};
use super::recorder::PerformanceMonitor;
use super::types::{
    CachePerformance, OperationBreakdown, PerformanceReport, PerformanceSample, RealTimeStats,
};
use crate::config::PerformanceConfig;
use crate::core::traits::{PerformanceStatsSource, ProcessStats};
use crate::utils::current_timestamp_millis;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

const SLOWEST_SAMPLES: usize = 10;
const DATABASE_OPERATION: &str = "database_query";

impl PerformanceMonitor {
    /// Aggregate the samples completed within the last `window`
    pub fn get_performance_report(&self, window: Duration) -> PerformanceReport {
        let window_ms = window.as_millis() as u64;
        let cutoff = current_timestamp_millis().saturating_sub(window_ms);

        let samples = self.samples.read();
        let in_window: Vec<&PerformanceSample> =
            samples.iter().filter(|s| s.timestamp > cutoff).collect();

        build_report(&in_window, window_ms, &self.config)
    }

    /// Live counters over the last one and five minutes
    pub fn get_real_time_stats(&self) -> RealTimeStats {
        let now = current_timestamp_millis();
        let one_minute_ago = now.saturating_sub(60_000);
        let five_minutes_ago = now.saturating_sub(300_000);

        let samples = self.samples.read();
        let recent: Vec<&PerformanceSample> = samples
            .iter()
            .filter(|s| s.timestamp > five_minutes_ago)
            .collect();
        let failures = recent.iter().filter(|s| !s.success).count();

        RealTimeStats {
            active_timers: self.active_timer_count(),
            buffered_samples: samples.len(),
            operations_last_minute: recent
                .iter()
                .filter(|s| s.timestamp > one_minute_ago)
                .count(),
            average_response_time: calculate_average(recent.iter().map(|s| &s.duration_ms)),
            error_rate: percentage(failures, recent.len()),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl PerformanceMonitor {
    /// Average duration and failure percentage over the last `window`
    pub fn process_stats(&self, window: Duration) -> ProcessStats {
        let cutoff = current_timestamp_millis().saturating_sub(window.as_millis() as u64);
        let samples = self.samples.read();
        let in_window: Vec<&PerformanceSample> =
            samples.iter().filter(|s| s.timestamp > cutoff).collect();
        let failures = in_window.iter().filter(|s| !s.success).count();

        ProcessStats {
            average_response_time_ms: calculate_average(in_window.iter().map(|s| &s.duration_ms)),
            error_rate: percentage(failures, in_window.len()),
            total_operations: in_window.len() as u64,
        }
    }
}

#[async_trait]
impl PerformanceStatsSource for PerformanceMonitor {
    async fn stats(&self, window: Duration) -> Result<ProcessStats> {
        Ok(self.process_stats(window))
    }
}

/// Build a report from samples already filtered to the window
pub(crate) fn build_report(
    samples: &[&PerformanceSample],
    window_ms: u64,
    config: &PerformanceConfig,
) -> PerformanceReport {
    if samples.is_empty() {
        return PerformanceReport::empty(window_ms);
    }

    let total = samples.len();
    let successes = samples.iter().filter(|s| s.success).count();

    let mut durations: Vec<u64> = samples.iter().map(|s| s.duration_ms).collect();
    durations.sort_unstable();

    let mut by_operation: BTreeMap<&str, Vec<&PerformanceSample>> = BTreeMap::new();
    for sample in samples {
        by_operation
            .entry(sample.operation.as_str())
            .or_default()
            .push(*sample);
    }

    let operation_breakdown: BTreeMap<String, OperationBreakdown> = by_operation
        .into_iter()
        .map(|(operation, group)| {
            (
                operation.to_string(),
                operation_stats(&group, config.threshold_for(operation)),
            )
        })
        .collect();

    let mut slowest: Vec<PerformanceSample> = samples.iter().map(|s| (*s).clone()).collect();
    slowest.sort_by(|a, b| b.duration_ms.cmp(&a.duration_ms));
    slowest.truncate(SLOWEST_SAMPLES);

    let cache_performance = cache_stats(samples);
    let recommendations = generate_recommendations(&operation_breakdown, &cache_performance, config);

    PerformanceReport {
        window_ms,
        generated_at: chrono::Utc::now(),
        total_operations: total,
        success_rate: percentage(successes, total),
        average_response_time: calculate_average(&durations),
        p95_response_time: nearest_rank_percentile(&durations, 0.95),
        p99_response_time: nearest_rank_percentile(&durations, 0.99),
        operation_breakdown,
        slowest_operations: slowest,
        cache_performance,
        recommendations,
    }
}

fn operation_stats(group: &[&PerformanceSample], threshold_ms: u64) -> OperationBreakdown {
    let mut durations: Vec<u64> = group.iter().map(|s| s.duration_ms).collect();
    durations.sort_unstable();

    let mut error_types = BTreeMap::new();
    for sample in group.iter().filter(|s| !s.success) {
        let kind = sample.error_type.as_deref().unwrap_or("unknown");
        *error_types.entry(kind.to_string()).or_insert(0) += 1;
    }

    OperationBreakdown {
        count: group.len(),
        average_time: calculate_average(&durations),
        p95_time: nearest_rank_percentile(&durations, 0.95),
        success_rate: percentage(group.iter().filter(|s| s.success).count(), group.len()),
        threshold_ms,
        error_types,
    }
}

fn cache_stats(samples: &[&PerformanceSample]) -> CachePerformance {
    let (hits, misses): (Vec<&PerformanceSample>, Vec<&PerformanceSample>) = samples
        .iter()
        .copied()
        .filter(|s| s.cache_hit().is_some())
        .partition(|s| s.cache_hit() == Some(true));

    let total = hits.len() + misses.len();
    if total == 0 {
        return CachePerformance::default();
    }

    CachePerformance {
        total_lookups: total,
        hit_rate: percentage(hits.len(), total),
        miss_rate: percentage(misses.len(), total),
        average_hit_time: calculate_average(hits.iter().map(|s| &s.duration_ms)),
        average_miss_time: calculate_average(misses.iter().map(|s| &s.duration_ms)),
    }
}

fn generate_recommendations(
    breakdown: &BTreeMap<String, OperationBreakdown>,
    cache: &CachePerformance,
    config: &PerformanceConfig,
) -> Vec<String> {
    let rules = &config.recommendations;
    let mut recommendations = Vec::new();

    for (operation, stats) in breakdown {
        let slow_limit = stats.threshold_ms as f64 * rules.slow_operation_factor;
        if stats.average_time > slow_limit {
            recommendations.push(format!(
                "Operation '{}' averages {:.0}ms, more than {:.1}x its {}ms threshold; consider caching or optimizing it",
                operation, stats.average_time, rules.slow_operation_factor, stats.threshold_ms
            ));
        }

        if stats.success_rate < rules.min_success_rate {
            let causes: Vec<&str> = stats.error_types.keys().map(String::as_str).collect();
            recommendations.push(format!(
                "Operation '{}' succeeds only {:.1}% of the time; investigate failures ({})",
                operation,
                stats.success_rate,
                causes.join(", ")
            ));
        }
    }

    if cache.total_lookups > 0 && cache.hit_rate < rules.min_cache_hit_rate {
        recommendations.push(format!(
            "Cache hit rate is {:.1}%; warm frequently viewed lofts or extend cache TTLs",
            cache.hit_rate
        ));
    }

    if let Some(db) = breakdown.get(DATABASE_OPERATION) {
        if db.average_time > db.threshold_ms as f64 {
            recommendations.push(format!(
                "Database queries average {:.0}ms against a {}ms threshold; review indexes and query plans",
                db.average_time, db.threshold_ms
            ));
        }
    }

    recommendations
}
