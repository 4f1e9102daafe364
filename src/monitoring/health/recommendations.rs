//! Recommendations derived from component statuses and system metrics

use super::types::{
    CACHE_COMPONENT, CONSISTENCY_COMPONENT, ComponentHealth, DATABASE_COMPONENT, HealthState,
    RESERVATIONS_COMPONENT, SystemMetrics,
};
use crate::config::AlertThresholds;
use std::collections::BTreeMap;

pub(super) fn generate_recommendations(
    components: &BTreeMap<String, ComponentHealth>,
    metrics: &SystemMetrics,
    thresholds: &AlertThresholds,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    for (name, health) in components {
        if matches!(health.status, HealthState::Healthy | HealthState::Unknown) {
            continue;
        }

        let recommendation = match (name.as_str(), health.status) {
            (DATABASE_COMPONENT, HealthState::Critical) => format!(
                "Database is failing health probes ({}); check connectivity and credentials",
                health.details
            ),
            (DATABASE_COMPONENT, _) => format!(
                "Database responses are slow ({}ms); review query plans and connection pooling",
                health.response_time_ms.unwrap_or_default()
            ),
            (CACHE_COMPONENT, _) => format!(
                "{}; warm frequently viewed lofts or review cache sizing",
                health.details
            ),
            (RESERVATIONS_COMPONENT, HealthState::Critical) => format!(
                "{}; review reservation security logs immediately",
                health.details
            ),
            (RESERVATIONS_COMPONENT, _) => format!(
                "{}; inspect the reservation funnel for failing steps",
                health.details
            ),
            (CONSISTENCY_COMPONENT, _) => format!(
                "{}; run a data integrity repair before accepting new bookings",
                health.details
            ),
            (other, status) => format!("Component {} is {}: {}", other, status, health.details),
        };
        recommendations.push(recommendation);
    }

    if metrics.average_response_time_ms > thresholds.response_time_ms.warning {
        recommendations.push(format!(
            "Average response time is {:.0}ms; investigate the slowest operations",
            metrics.average_response_time_ms
        ));
    }
    if metrics.error_rate > thresholds.error_rate.warning {
        recommendations.push(format!(
            "Error rate is {:.1}%; review recent failures in the error tracker",
            metrics.error_rate
        ));
    }
    if metrics.memory_usage_percent > thresholds.memory_usage.warning {
        recommendations.push(format!(
            "Memory usage is {:.1}%; check for growing buffers or scale the host",
            metrics.memory_usage_percent
        ));
    }

    if recommendations.is_empty() {
        recommendations.push("All systems operating normally".to_string());
    }

    recommendations
}
