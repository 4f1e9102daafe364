//! Performance recorder integration tests
//!
//! Measuring wrappers around real store and cache calls, and the reports
//! built from them.

#[cfg(test)]
mod tests {
    use crate::common::{TestMonitor, seeded_store};
    use chrono::NaiveDate;
    use loft_monitor::MonitorError;
    use loft_monitor::core::traits::{CacheStatsSource, RelationalStore};
    use loft_monitor::monitoring::PerformanceSample;
    use serde_json::json;
    use std::time::Duration;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_wrapped_store_calls_feed_the_report() {
        let store = seeded_store();
        store.fail_table("loft_availability", "statement timeout");
        let harness = TestMonitor::new(store.clone());
        let performance = harness.monitor.performance();

        let lofts = performance
            .measure_loft_search(json!({"max_guests": 4}), store.select("lofts", "*", 10))
            .await
            .unwrap();
        assert_eq!(lofts.len(), 3);

        let check_in = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2026, 11, 4).unwrap();
        let available = performance
            .measure_availability_check("loft-1", check_in, check_out, async {
                let rows = store.select("loft_availability", "loft_id", 10).await?;
                Ok::<_, MonitorError>(!rows.is_empty())
            })
            .await;
        assert!(matches!(available, Err(MonitorError::Database(_))));

        let report = performance.get_performance_report(HOUR);
        assert_eq!(report.total_operations, 2);
        assert_eq!(report.success_rate, 50.0);
        assert_eq!(report.slowest_operations.len(), 2);

        let search = &report.operation_breakdown["loft_search"];
        assert_eq!(search.count, 1);
        assert_eq!(search.success_rate, 100.0);

        let availability = &report.operation_breakdown["availability_check"];
        assert_eq!(availability.error_types["DatabaseError"], 1);
        assert_eq!(availability.success_rate, 0.0);
        assert!(
            report
                .recommendations
                .iter()
                .any(|r| r.contains("'availability_check'") && r.contains("DatabaseError"))
        );

        let sample = report
            .slowest_operations
            .iter()
            .find(|s| s.operation == "loft_search")
            .unwrap();
        assert_eq!(sample.context["result_count"], json!(3));
        assert_eq!(sample.context["filters"], json!({"max_guests": 4}));
    }

    #[tokio::test]
    async fn test_cache_lookups_are_reported() {
        let harness = TestMonitor::new(seeded_store());
        let performance = harness.monitor.performance();
        let cache = harness.monitor.cache();

        let lookup = move || async move {
            performance
                .measure_cache_lookup("loft-1", async {
                    Ok::<_, MonitorError>(cache.get("loft-1").await)
                })
                .await
                .unwrap()
        };

        assert!(lookup().await.is_none());
        cache.warm_up_cache(&["loft-1".to_string()]).await.unwrap();
        assert!(lookup().await.is_some());

        let report = performance.get_performance_report(HOUR);
        assert_eq!(report.cache_performance.total_lookups, 2);
        assert_eq!(report.cache_performance.hit_rate, 50.0);
        assert_eq!(report.cache_performance.miss_rate, 50.0);
        assert!(
            report
                .recommendations
                .iter()
                .any(|r| r.starts_with("Cache hit rate is 50.0%"))
        );

        // The cache counts the same lookups on its side
        let stats = cache.cache_stats().await.unwrap();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.hit_rate, 50.0);
    }

    #[tokio::test]
    async fn test_report_window_excludes_old_samples() {
        let harness = TestMonitor::new(seeded_store());
        let performance = harness.monitor.performance();
        let two_hours_ago = (chrono::Utc::now().timestamp_millis() - 2 * 3_600_000) as u64;

        performance.record_metric(
            PerformanceSample::new("loft_search", 4_000, true).with_timestamp(two_hours_ago),
        );
        performance.record_metric(PerformanceSample::new("loft_search", 40, true));
        performance.record_metric(PerformanceSample::new("loft_details", 60, true));

        let report = performance.get_performance_report(HOUR);
        assert_eq!(report.total_operations, 2);
        assert_eq!(report.average_response_time, 50.0);
        assert_eq!(report.p99_response_time, 60);

        let all = performance.get_performance_report(3 * HOUR);
        assert_eq!(all.total_operations, 3);
        assert_eq!(all.slowest_operations[0].duration_ms, 4_000);
    }

    #[tokio::test]
    async fn test_timers_and_real_time_stats() {
        let harness = TestMonitor::new(seeded_store());
        let performance = harness.monitor.performance();

        let timer = performance.start_timing("reservation_creation", Default::default());
        assert_eq!(performance.get_real_time_stats().active_timers, 1);

        tokio::time::sleep(Duration::from_millis(5)).await;
        let duration =
            performance.end_timing(&timer, "reservation_creation", false, Some("Conflict"), None);
        assert!(duration >= 5);

        // Ending the same timer twice records nothing
        assert_eq!(
            performance.end_timing(&timer, "reservation_creation", true, None, None),
            0
        );

        let stats = performance.get_real_time_stats();
        assert_eq!(stats.active_timers, 0);
        assert_eq!(stats.buffered_samples, 1);
        assert_eq!(stats.operations_last_minute, 1);
        assert_eq!(stats.error_rate, 100.0);
    }
}
