//! Health monitor integration tests
//!
//! Component checks and alerting over the in-process adapters.

#[cfg(test)]
mod tests {
    use crate::common::{TestMonitor, seeded_store};
    use loft_monitor::Result;
    use loft_monitor::monitoring::{
        AlertRequest, AlertSeverity, AlertType, HealthState, PerformanceSample,
    };
    use loft_monitor::storage::Tables;
    use serde_json::{Value, json};
    use std::sync::Arc;

    const COMPONENTS: [&str; 4] = ["cache", "data_consistency", "database", "reservations"];

    // ==================== Healthy system ====================

    #[tokio::test]
    async fn test_consistent_store_is_healthy() {
        let harness = TestMonitor::new(seeded_store());
        harness.prime_cache().await;

        let status = harness.monitor.health().perform_health_check().await;

        assert_eq!(status.status, HealthState::Healthy, "{:#?}", status.components);
        let names: Vec<&str> = status.components.keys().map(String::as_str).collect();
        assert_eq!(names, COMPONENTS);
        assert!(status.alerts.is_empty());
        assert_eq!(status.recommendations, vec!["All systems operating normally"]);
        assert_eq!(status.metrics.cache_hit_rate, Some(100.0));

        let consistency = &status.components["data_consistency"];
        assert!(consistency.details.contains("foreign key check not applicable"));

        // The snapshot is kept for readers
        let stored = harness.monitor.health().get_health_status();
        assert_eq!(stored.status, HealthState::Healthy);
        assert_eq!(stored.timestamp, status.timestamp);
    }

    #[tokio::test]
    async fn test_cold_cache_does_not_degrade_health() {
        let harness = TestMonitor::new(seeded_store());

        let status = harness.monitor.health().perform_health_check().await;

        assert_eq!(status.components["cache"].status, HealthState::Healthy);
        assert_eq!(status.metrics.cache_hit_rate, None);
        assert_eq!(status.status, HealthState::Healthy);
    }

    // ==================== Component failures ====================

    #[tokio::test]
    async fn test_orphaned_reservation_raises_and_resolves_consistency_alert() {
        let store = seeded_store();
        store.insert("reservations", json!({"id": "res-9", "loft_id": "loft-404"}));
        let harness = TestMonitor::new(store.clone());
        harness.prime_cache().await;
        let health = harness.monitor.health();

        let status = health.perform_health_check().await;

        let consistency = &status.components["data_consistency"];
        assert_eq!(consistency.status, HealthState::Critical);
        assert_eq!(consistency.metric("orphaned_reservations"), Some(1.0));
        assert!(consistency.details.contains("1 reservations reference missing lofts"));
        assert_eq!(status.status, HealthState::Critical);

        let alert = status
            .alerts
            .iter()
            .find(|a| a.component == "data_consistency")
            .expect("consistency alert");
        assert_eq!(alert.alert_type, AlertType::Consistency);
        assert_eq!(alert.severity, AlertSeverity::Critical);

        // A second failing cycle updates the same alert
        let status = health.perform_health_check().await;
        let repeated: Vec<_> = status
            .alerts
            .iter()
            .filter(|a| a.component == "data_consistency")
            .collect();
        assert_eq!(repeated.len(), 1);
        assert_eq!(repeated[0].id, alert.id);
        assert_eq!(repeated[0].occurrences, 2);

        // Repairing the data resolves it
        assert_eq!(store.delete("reservations", &json!("res-9")), 1);
        let status = health.perform_health_check().await;
        assert_eq!(status.components["data_consistency"].status, HealthState::Healthy);
        assert!(!health.get_active_alerts().iter().any(|a| a.id == alert.id));

        let history = health.get_alert_history();
        let resolved = history.iter().find(|a| a.id == alert.id).expect("resolved alert");
        assert!(resolved.resolved);
        assert!(resolved.resolved_at.is_some());
    }

    #[tokio::test]
    async fn test_failing_table_degrades_database_only() {
        let store = seeded_store();
        store.fail_table("loft_availability", "connection reset by peer");
        let harness = TestMonitor::new(store);
        harness.prime_cache().await;

        let status = harness.monitor.health().perform_health_check().await;

        let database = &status.components["database"];
        assert_eq!(database.status, HealthState::Critical);
        assert_eq!(database.error_count, 1);
        assert!(database.details.contains("loft_availability: "));
        assert!(database.details.contains("connection reset by peer"));

        for name in ["cache", "data_consistency", "reservations"] {
            assert_eq!(status.components[name].status, HealthState::Healthy, "{}", name);
        }
        assert!(status.alerts.iter().any(|a| {
            a.component == "database" && a.alert_type == AlertType::Error
        }));
    }

    #[tokio::test]
    async fn test_missing_loft_table_is_reported_by_several_checks() {
        let store = seeded_store();
        store.fail_table("lofts", "relation \"lofts\" is locked");
        let harness = TestMonitor::new(store);

        let status = harness.monitor.health().perform_health_check().await;

        assert_eq!(status.components["database"].status, HealthState::Critical);
        let consistency = &status.components["data_consistency"];
        assert_eq!(consistency.status, HealthState::Critical);
        assert!(consistency.details.contains("loft probe failed"));
        assert!(consistency.details.contains("orphan probe failed"));
        assert_eq!(consistency.error_count, 2);
    }

    #[tokio::test]
    async fn test_foreign_key_violations_are_a_warning() {
        let store = seeded_store();
        store.register_procedure(
            "check_foreign_key_constraints",
            Arc::new(|_tables: &Tables, _args: &Value| -> Result<Value> {
                Ok(json!([
                    {"table": "reservations", "constraint": "reservations_loft_id_fkey"},
                    {"table": "loft_availability", "constraint": "availability_loft_id_fkey"},
                ]))
            }),
        );
        let harness = TestMonitor::new(store);
        harness.prime_cache().await;

        let status = harness.monitor.health().perform_health_check().await;

        let consistency = &status.components["data_consistency"];
        assert_eq!(consistency.status, HealthState::Warning);
        assert!(consistency.details.contains("2 foreign key violations"));
        assert_eq!(status.status, HealthState::Warning);
    }

    #[tokio::test]
    async fn test_security_incident_marks_reservations_critical() {
        let harness = TestMonitor::new(seeded_store());
        harness.prime_cache().await;
        harness.monitor.tracker().record_security_incident(
            "Repeated reservation attempts with forged tokens",
            json!({"ip": "203.0.113.7"}),
        );

        let status = harness.monitor.health().perform_health_check().await;

        let reservations = &status.components["reservations"];
        assert_eq!(reservations.status, HealthState::Critical);
        assert_eq!(reservations.metric("security_incidents"), Some(1.0));
        assert!(status.alerts.iter().any(|a| {
            a.component == "reservations" && a.alert_type == AlertType::Security
        }));
    }

    #[tokio::test]
    async fn test_failed_reservations_degrade_reservations() {
        let harness = TestMonitor::new(seeded_store());
        harness.prime_cache().await;
        let tracker = harness.monitor.tracker();
        tracker.record_attempt("loft-1", true, 120);
        tracker.record_attempt("loft-2", false, 340);

        let status = harness.monitor.health().perform_health_check().await;

        let reservations = &status.components["reservations"];
        assert_eq!(reservations.status, HealthState::Warning);
        assert!(reservations.details.contains("high error rate 50.0%"));
    }

    // ==================== Metric alerts ====================

    #[tokio::test]
    async fn test_error_rate_rule_uses_recorded_samples() {
        let harness = TestMonitor::new(seeded_store());
        harness.prime_cache().await;
        let performance = harness.monitor.performance();
        for _ in 0..3 {
            performance.record_metric(
                PerformanceSample::new("reservation_creation", 15, false).with_error("Timeout"),
            );
        }
        performance.record_metric(PerformanceSample::new("loft_search", 12, true));

        let status = harness.monitor.health().perform_health_check().await;

        assert_eq!(status.metrics.error_rate, 75.0);
        assert_eq!(status.metrics.total_operations, 4);
        let alert = status
            .alerts
            .iter()
            .find(|a| a.alert_type == AlertType::Error && a.component == "application")
            .expect("error rate alert");
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert!(status.recommendations.iter().any(|r| r.contains("Error rate is 75.0%")));

        // Clearing the samples clears the condition
        performance.clear_metrics();
        let status = harness.monitor.health().perform_health_check().await;
        assert!(!status.alerts.iter().any(|a| a.id == alert.id));
    }

    #[tokio::test]
    async fn test_manual_alerts() {
        let harness = TestMonitor::new(seeded_store());
        let health = harness.monitor.health();

        let request = AlertRequest::new(
            AlertType::Performance,
            AlertSeverity::Warning,
            "pricing",
            "Seasonal pricing table is stale",
        );
        let alert = health.add_alert(request.clone());
        assert!(health.has_active_alert(&request));
        assert_eq!(health.get_active_alerts().len(), 1);

        assert!(health.resolve_alert(&alert.id));
        assert!(!health.resolve_alert(&alert.id));
        assert!(!health.has_active_alert(&request));
        assert_eq!(health.get_alert_history()[0].id, alert.id);
    }
}
