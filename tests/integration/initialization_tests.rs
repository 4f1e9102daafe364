//! Initialization orchestrator integration tests
//!
//! Start-up, signal-driven shutdown and the `LoftMonitor::run` lifecycle.

#[cfg(test)]
mod tests {
    use crate::common::{TestMonitor, seeded_store, test_config};
    use loft_monitor::config::InitializationConfigUpdate;
    use loft_monitor::monitoring::HealthState;
    use loft_monitor::{InMemoryStore, MonitorError};
    use std::time::Duration;

    const DEADLINE: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_initialize_wires_every_service() {
        let harness = TestMonitor::new(seeded_store());
        let service = harness.monitor.service();

        let result = service.initialize(None).await;

        assert!(result.success, "{:?}", result.errors);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);

        let status = service.get_services_status().await;
        assert!(status.initialized);
        assert!(status.health_monitoring);
        assert!(status.performance_monitoring);
        assert!(!status.signal_handlers_registered);
        assert!(!status.panic_hook_installed);
        assert_eq!(status.health_status, HealthState::Healthy);
        assert_eq!(status.performance.buffered_samples, 1);

        // Two of the three lofts are configured for warm-up
        let cache = status.cache.expect("cache stats");
        assert_eq!(cache.cache_size, 2);
        assert!(harness.monitor.cache().get("loft-1").await.is_some());
        assert!(harness.monitor.cache().get("loft-3").await.is_none());

        let behaviors = harness.monitor.tracker().behaviors();
        assert_eq!(behaviors.len(), 1);
        assert_eq!(behaviors[0].event, "performance_monitoring_initialized");

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_lofts_table_is_reported_as_warnings() {
        let store = InMemoryStore::new();
        store.create_table("reservations");
        store.create_table("loft_availability");
        let harness = TestMonitor::new(store);

        let result = harness.monitor.service().initialize(None).await;

        assert!(result.success);
        assert!(
            result.warnings.iter().any(|w| w.starts_with("Cache warm-up failed")),
            "{:?}",
            result.warnings
        );
        let critical = result
            .warnings
            .iter()
            .find(|w| w.starts_with("Initial health check reported critical status"))
            .expect("critical health warning");
        assert!(critical.contains("database"));
        assert!(critical.contains("data_consistency"));
    }

    #[tokio::test]
    async fn test_signal_triggers_shutdown() {
        let mut config = test_config();
        config.initialization.handle_signals = true;
        let harness = TestMonitor::with_config(seeded_store(), config);
        let service = harness.monitor.service();

        assert!(service.initialize(None).await.success);
        assert!(service.get_services_status().await.signal_handlers_registered);

        harness.signals.send("SIGTERM");
        tokio::time::timeout(DEADLINE, service.wait_for_shutdown())
            .await
            .expect("shutdown after SIGTERM");

        assert!(!service.is_initialized());
        let status = service.get_services_status().await;
        assert!(!status.health_monitoring);
        assert!(!status.performance_monitoring);
        assert_eq!(status.performance.buffered_samples, 0);
        // Outside production the cache is dropped on shutdown
        assert_eq!(status.cache.expect("cache stats").cache_size, 0);
    }

    #[tokio::test]
    async fn test_run_returns_after_signal() {
        let mut config = test_config();
        config.initialization.handle_signals = true;
        let harness = TestMonitor::with_config(seeded_store(), config);

        let monitor = harness.monitor.clone();
        let running = tokio::spawn(async move { monitor.run().await });

        tokio::time::timeout(DEADLINE, async {
            while !harness.monitor.service().is_initialized() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("monitor initialized");

        harness.signals.send("SIGINT");
        let outcome = tokio::time::timeout(DEADLINE, running)
            .await
            .expect("run returned")
            .expect("run task");
        assert!(outcome.is_ok());
        assert!(!harness.monitor.service().is_initialized());
    }

    #[tokio::test]
    async fn test_invalid_override_is_rejected_before_start() {
        let harness = TestMonitor::new(seeded_store());

        let result = harness
            .monitor
            .service()
            .initialize(Some(InitializationConfigUpdate {
                health_check_interval_secs: Some(0),
                ..Default::default()
            }))
            .await;
        assert!(!result.success);
        assert!(result.errors[0].contains("Initialization config error"));
        assert!(!harness.monitor.service().is_initialized());
        assert!(!harness.monitor.health().is_monitoring());
    }

    #[tokio::test]
    async fn test_production_shutdown_keeps_cache() {
        let mut config = test_config();
        config.initialization.environment = "production".parse().unwrap();
        let harness = TestMonitor::with_config(seeded_store(), config);
        let service = harness.monitor.service();

        assert!(service.initialize(None).await.success);
        service.shutdown().await.unwrap();

        let status = service.get_services_status().await;
        assert!(!status.initialized);
        assert_eq!(status.cache.expect("cache stats").cache_size, 2);
    }

    #[tokio::test]
    async fn test_reinitialize_after_shutdown() {
        let harness = TestMonitor::new(seeded_store());
        let service = harness.monitor.service();

        assert!(service.initialize(None).await.success);
        let again = service.initialize(None).await;
        assert_eq!(again.warnings, vec!["Services already initialized"]);

        service.shutdown().await.unwrap();
        let result = service.initialize(None).await;
        assert!(result.success);
        assert!(result.warnings.is_empty());
        assert_eq!(harness.monitor.tracker().behaviors().len(), 2);
    }

    #[test]
    fn test_invalid_environment_is_a_config_error() {
        let err = "staging"
            .parse::<loft_monitor::config::Environment>()
            .unwrap_err();
        assert!(MonitorError::config(err).to_string().contains("Unknown environment: staging"));
    }
}
