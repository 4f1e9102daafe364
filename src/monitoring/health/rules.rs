//! Metric alert rules

use super::types::{AlertSeverity, AlertType, SystemMetrics};
use crate::config::{AlertThresholds, ThresholdPair};

/// Comparison operators for alert rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Whether `value` breaches `threshold` under this operator
    pub fn breaches(&self, value: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::GreaterThan => value > threshold,
            ComparisonOperator::LessThan => value < threshold,
            ComparisonOperator::GreaterThanOrEqual => value >= threshold,
            ComparisonOperator::LessThanOrEqual => value <= threshold,
        }
    }
}

/// System metric watched by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    ResponseTime,
    ErrorRate,
    MemoryUsage,
    CacheHitRate,
}

impl MetricKind {
    /// Current value, or `None` when the metric could not be collected
    pub fn value(&self, metrics: &SystemMetrics) -> Option<f64> {
        match self {
            MetricKind::ResponseTime => Some(metrics.average_response_time_ms),
            MetricKind::ErrorRate => Some(metrics.error_rate),
            MetricKind::MemoryUsage => Some(metrics.memory_usage_percent),
            MetricKind::CacheHitRate => metrics.cache_hit_rate,
        }
    }
}

/// Two-tier threshold rule over a system metric
#[derive(Debug, Clone)]
pub struct AlertRule {
    /// Rule ID, part of the alert deduplication key
    pub id: &'static str,
    pub metric: MetricKind,
    pub operator: ComparisonOperator,
    pub thresholds: ThresholdPair,
    pub alert_type: AlertType,
    pub component: &'static str,
    /// Human readable label used in alert messages
    pub label: &'static str,
    pub unit: &'static str,
}

impl AlertRule {
    /// Severity of the breach, checking the critical tier first
    pub fn evaluate(&self, value: f64) -> Option<AlertSeverity> {
        if self.operator.breaches(value, self.thresholds.critical) {
            Some(AlertSeverity::Critical)
        } else if self.operator.breaches(value, self.thresholds.warning) {
            Some(AlertSeverity::Warning)
        } else {
            None
        }
    }

    pub fn message(&self, value: f64, severity: AlertSeverity) -> String {
        let threshold = match severity {
            AlertSeverity::Critical => self.thresholds.critical,
            _ => self.thresholds.warning,
        };
        let relation = match self.operator {
            ComparisonOperator::GreaterThan | ComparisonOperator::GreaterThanOrEqual => "above",
            ComparisonOperator::LessThan | ComparisonOperator::LessThanOrEqual => "below",
        };
        format!(
            "{} is {:.1}{}, {} the {} threshold of {:.1}{}",
            self.label,
            value,
            self.unit,
            relation,
            severity.to_string().to_lowercase(),
            threshold,
            self.unit
        )
    }
}

/// Rules for average response time, error rate, memory usage and cache hit rate
pub fn default_rules(thresholds: &AlertThresholds) -> Vec<AlertRule> {
    vec![
        AlertRule {
            id: "response_time",
            metric: MetricKind::ResponseTime,
            operator: ComparisonOperator::GreaterThan,
            thresholds: thresholds.response_time_ms,
            alert_type: AlertType::Performance,
            component: "application",
            label: "Average response time",
            unit: "ms",
        },
        AlertRule {
            id: "error_rate",
            metric: MetricKind::ErrorRate,
            operator: ComparisonOperator::GreaterThan,
            thresholds: thresholds.error_rate,
            alert_type: AlertType::Error,
            component: "application",
            label: "Error rate",
            unit: "%",
        },
        AlertRule {
            id: "memory_usage",
            metric: MetricKind::MemoryUsage,
            operator: ComparisonOperator::GreaterThan,
            thresholds: thresholds.memory_usage,
            alert_type: AlertType::Performance,
            component: "system",
            label: "Memory usage",
            unit: "%",
        },
        AlertRule {
            id: "cache_hit_rate",
            metric: MetricKind::CacheHitRate,
            operator: ComparisonOperator::LessThan,
            thresholds: thresholds.cache_hit_rate,
            alert_type: AlertType::Performance,
            component: "cache",
            label: "Cache hit rate",
            unit: "%",
        },
    ]
}
