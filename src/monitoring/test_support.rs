//! Mock collaborators shared by the monitoring unit tests

use crate::config::HealthConfig;
use crate::core::traits::{
    CacheStats, MockCacheStatsSource, MockMemoryProbe, MockPerformanceStatsSource,
    MockRelationalStore, MockReservationMetricsSource, ProcessStats, ReservationMetrics,
};
use crate::monitoring::health::{HealthDependencies, SystemHealthMonitor};
use serde_json::json;
use std::sync::Arc;

pub(crate) struct Collaborators {
    pub store: MockRelationalStore,
    pub cache: MockCacheStatsSource,
    pub reservations: MockReservationMetricsSource,
    pub performance: MockPerformanceStatsSource,
    pub memory: MockMemoryProbe,
}

impl Collaborators {
    /// Every collaborator answers with healthy values
    pub fn healthy() -> Self {
        let mut store = MockRelationalStore::new();
        store
            .expect_select()
            .returning(|_, _, _| Ok(vec![json!({"id": "loft-1"})]));
        store.expect_find_orphans().returning(|_, _, _, _| Ok(vec![]));
        store
            .expect_call_procedure()
            .returning(|_, _| Ok(Some(json!([]))));

        let mut cache = MockCacheStatsSource::new();
        cache.expect_cache_stats().returning(|| {
            Ok(CacheStats {
                hit_rate: 85.0,
                total_requests: 200,
                cache_size: 40,
                average_response_time_ms: 5.0,
            })
        });

        let mut reservations = MockReservationMetricsSource::new();
        reservations
            .expect_reservation_metrics()
            .returning(|_| Ok(healthy_reservations()));

        let mut performance = MockPerformanceStatsSource::new();
        performance.expect_stats().returning(|_| {
            Ok(ProcessStats {
                average_response_time_ms: 120.0,
                error_rate: 1.0,
                total_operations: 50,
            })
        });

        let mut memory = MockMemoryProbe::new();
        memory.expect_memory_usage_percent().return_const(40.0);

        Self {
            store,
            cache,
            reservations,
            performance,
            memory,
        }
    }

    pub fn into_dependencies(self) -> HealthDependencies {
        HealthDependencies {
            store: Arc::new(self.store),
            cache: Arc::new(self.cache),
            reservations: Arc::new(self.reservations),
            performance: Arc::new(self.performance),
            memory: Arc::new(self.memory),
        }
    }

    pub fn into_monitor(self) -> SystemHealthMonitor {
        SystemHealthMonitor::new(HealthConfig::default(), self.into_dependencies())
    }
}

pub(crate) fn healthy_reservations() -> ReservationMetrics {
    ReservationMetrics {
        total_reservations: 40,
        successful_reservations: 39,
        failed_reservations: 1,
        error_rate: 2.5,
        conversion_rate: 30.0,
        average_processing_time_ms: 800.0,
        security_incidents: 0,
    }
}
