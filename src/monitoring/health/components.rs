//! Component health checks

use super::monitor::SystemHealthMonitor;
use super::types::{CapabilityProbe, ComponentHealth, HealthState};
use crate::utils::error::Result;
use serde_json::{Value, json};
use std::time::Instant;
use tracing::debug;

const LOFTS_TABLE: &str = "lofts";
const RESERVATIONS_TABLE: &str = "reservations";
const LOFT_FOREIGN_KEY: &str = "loft_id";

impl SystemHealthMonitor {
    /// Probe each configured table with a row-limited select
    pub(super) async fn check_database(&self) -> Result<ComponentHealth> {
        debug!("Checking database health");
        let config = &self.config.database;
        let start = Instant::now();

        let probes = config.probe_tables.iter().map(|table| async move {
            (
                table.as_str(),
                self.deps.store.select(table, "id", config.probe_limit).await,
            )
        });
        let results = futures::future::join_all(probes).await;
        let response_time = start.elapsed().as_millis() as u64;

        let failures: Vec<String> = results
            .into_iter()
            .filter_map(|(table, result)| result.err().map(|e| format!("{}: {}", table, e)))
            .collect();
        let error_count = failures.len() as u32;

        let status = HealthState::from_probe(
            error_count,
            response_time as f64,
            config.warning_ms as f64,
            config.critical_ms as f64,
        );
        let details = if failures.is_empty() {
            format!("Database responding in {}ms", response_time)
        } else {
            format!("Database probe failures: {}", failures.join("; "))
        };

        Ok(ComponentHealth {
            error_count,
            ..ComponentHealth::new(status, details)
                .with_response_time(response_time)
                .with_metric("tables_probed", config.probe_tables.len())
        })
    }

    /// Read hit rate and latency from the cache
    pub(super) async fn check_cache(&self) -> Result<ComponentHealth> {
        debug!("Checking cache health");
        let config = &self.config.cache;
        let start = Instant::now();

        let stats = self.deps.cache.cache_stats().await?;
        let response_time = start.elapsed().as_millis() as u64;

        let mut issues = Vec::new();
        // A cache that has served no lookups has no meaningful hit rate
        if stats.total_requests > 0 && stats.hit_rate < config.min_hit_rate {
            issues.push(format!(
                "hit rate {:.1}% below {:.1}%",
                stats.hit_rate, config.min_hit_rate
            ));
        }
        if stats.average_response_time_ms > config.warning_response_ms {
            issues.push(format!(
                "average response time {:.1}ms above {:.1}ms",
                stats.average_response_time_ms, config.warning_response_ms
            ));
        }
        let error_count = issues.len() as u32;

        let status = HealthState::from_probe(
            error_count,
            stats.average_response_time_ms,
            config.warning_response_ms,
            config.critical_response_ms,
        );
        let details = if issues.is_empty() {
            format!(
                "Cache healthy: {:.1}% hit rate over {} requests",
                stats.hit_rate, stats.total_requests
            )
        } else {
            format!("Cache degraded: {}", issues.join("; "))
        };

        Ok(ComponentHealth {
            error_count,
            ..ComponentHealth::new(status, details)
                .with_response_time(response_time)
                .with_metric("hit_rate", stats.hit_rate)
                .with_metric("total_requests", stats.total_requests)
                .with_metric("cache_size", stats.cache_size)
                .with_metric("average_response_time_ms", stats.average_response_time_ms)
        })
    }

    /// Read the reservation metrics snapshot and flag degradations
    pub(super) async fn check_reservations(&self) -> Result<ComponentHealth> {
        debug!("Checking reservation subsystem health");
        let config = &self.config.reservations;
        let start = Instant::now();

        let metrics = self
            .deps
            .reservations
            .reservation_metrics(config.metrics_window())
            .await?;
        let response_time = start.elapsed().as_millis() as u64;

        let mut issues = Vec::new();
        if metrics.error_rate > config.max_error_rate {
            issues.push(format!("high error rate {:.1}%", metrics.error_rate));
        }
        if metrics.conversion_rate < config.min_conversion_rate {
            issues.push(format!("low conversion rate {:.1}%", metrics.conversion_rate));
        }
        if metrics.security_incidents > 0 {
            issues.push(format!("{} security incidents", metrics.security_incidents));
        }

        let status = if metrics.security_incidents > 0 {
            HealthState::Critical
        } else if !issues.is_empty() {
            HealthState::Warning
        } else {
            HealthState::Healthy
        };
        let details = if issues.is_empty() {
            format!(
                "{} reservations, {:.1}% conversion",
                metrics.total_reservations, metrics.conversion_rate
            )
        } else {
            format!("Reservation issues: {}", issues.join("; "))
        };

        Ok(ComponentHealth::new(status, details)
            .with_response_time(response_time)
            .with_metric("total_reservations", metrics.total_reservations)
            .with_metric("error_rate", metrics.error_rate)
            .with_metric("conversion_rate", metrics.conversion_rate)
            .with_metric("security_incidents", metrics.security_incidents)
            .with_metric(
                "average_processing_time_ms",
                metrics.average_processing_time_ms,
            ))
    }

    /// Lofts present, no orphaned reservations, and the optional foreign key procedure
    pub(super) async fn check_data_consistency(&self) -> Result<ComponentHealth> {
        debug!("Checking data consistency");
        let config = &self.config.consistency;
        let store = &self.deps.store;
        let start = Instant::now();

        let (lofts, orphans, procedure) = futures::join!(
            store.select(LOFTS_TABLE, "id", 1),
            store.find_orphans(
                RESERVATIONS_TABLE,
                LOFT_FOREIGN_KEY,
                LOFTS_TABLE,
                config.orphan_limit
            ),
            self.probe_foreign_keys(),
        );
        let response_time = start.elapsed().as_millis() as u64;

        let mut error_count = 0;
        let mut critical = Vec::new();
        let mut warnings = Vec::new();
        let mut notes = Vec::new();

        match lofts {
            Ok(rows) if rows.is_empty() => warnings.push("no lofts found".to_string()),
            Ok(_) => {}
            Err(e) => {
                error_count += 1;
                critical.push(format!("loft probe failed: {}", e));
            }
        }

        let orphan_count = match orphans {
            Ok(rows) => {
                if !rows.is_empty() {
                    critical.push(format!(
                        "{} reservations reference missing lofts",
                        rows.len()
                    ));
                }
                rows.len()
            }
            Err(e) => {
                error_count += 1;
                critical.push(format!("orphan probe failed: {}", e));
                0
            }
        };

        match procedure {
            CapabilityProbe::Supported(violations) if violations > 0 => {
                warnings.push(format!("{} foreign key violations", violations));
            }
            CapabilityProbe::Supported(_) => {}
            CapabilityProbe::Unsupported => {
                notes.push("foreign key check not applicable".to_string());
            }
            CapabilityProbe::Failed(message) => {
                error_count += 1;
                critical.push(format!("foreign key check failed: {}", message));
            }
        }

        let status = if !critical.is_empty() {
            HealthState::Critical
        } else if !warnings.is_empty() {
            HealthState::Warning
        } else {
            HealthState::Healthy
        };

        let mut findings: Vec<String> = critical.into_iter().chain(warnings).collect();
        let details = if findings.is_empty() {
            let mut details = "Data consistency verified".to_string();
            if !notes.is_empty() {
                details.push_str(&format!(" ({})", notes.join("; ")));
            }
            details
        } else {
            findings.extend(notes);
            format!("Consistency issues: {}", findings.join("; "))
        };

        Ok(ComponentHealth {
            error_count,
            ..ComponentHealth::new(status, details)
                .with_response_time(response_time)
                .with_metric("orphaned_reservations", orphan_count)
        })
    }

    /// Call the foreign key procedure and count reported violations
    pub(super) async fn probe_foreign_keys(&self) -> CapabilityProbe<usize> {
        let name = &self.config.consistency.foreign_key_procedure;

        match self.deps.store.call_procedure(name, json!({})).await {
            Ok(Some(result)) => CapabilityProbe::Supported(count_violations(&result)),
            Ok(None) => {
                debug!(procedure = %name, "Foreign key procedure not available");
                CapabilityProbe::Unsupported
            }
            Err(e) => CapabilityProbe::Failed(e.to_string()),
        }
    }
}

/// Violations reported by the foreign key procedure: a list of rows, a
/// `violations` field, or a bare count
fn count_violations(result: &Value) -> usize {
    match result {
        Value::Array(rows) => rows.len(),
        Value::Number(n) => n.as_u64().unwrap_or(0) as usize,
        Value::Object(map) => map.get("violations").map(count_violations).unwrap_or(0),
        _ => 0,
    }
}
