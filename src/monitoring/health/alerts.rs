//! Alert store with deduplication and resolved history

use super::types::{AlertRequest, HealthAlert};
use crate::monitoring::performance::BoundedPush;
use std::collections::{HashMap, VecDeque};

/// Open alerts keyed by deduplication key, plus resolved history
#[derive(Debug, Default)]
pub(super) struct AlertStore {
    active: HashMap<String, HealthAlert>,
    /// Resolved alerts, oldest first
    history: VecDeque<HealthAlert>,
    history_limit: usize,
}

/// Result of raising an alert
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Raised {
    New(HealthAlert),
    Repeated(HealthAlert),
}

impl AlertStore {
    pub(super) fn new(history_limit: usize) -> Self {
        Self {
            active: HashMap::new(),
            history: VecDeque::new(),
            history_limit,
        }
    }

    /// Open an alert, or refresh the open alert with the same key
    pub(super) fn raise(&mut self, request: AlertRequest) -> Raised {
        let key = request.key();
        let now = chrono::Utc::now();

        if let Some(existing) = self.active.get_mut(&key) {
            existing.severity = request.severity;
            existing.message = request.message;
            existing.last_seen = now;
            existing.occurrences += 1;
            if request.details.is_some() {
                existing.details = request.details;
            }
            return Raised::Repeated(existing.clone());
        }

        let id = self.unique_id(&request, now);
        let alert = HealthAlert {
            id,
            alert_type: request.alert_type,
            severity: request.severity,
            message: request.message,
            component: request.component,
            timestamp: now,
            last_seen: now,
            occurrences: 1,
            resolved: false,
            resolved_at: None,
            details: request.details,
        };
        self.active.insert(key, alert.clone());
        Raised::New(alert)
    }

    fn unique_id(&self, request: &AlertRequest, now: chrono::DateTime<chrono::Utc>) -> String {
        let base = format!(
            "{}_{}_{}",
            request.alert_type,
            request.component,
            now.timestamp_millis()
        );
        let taken = |id: &str| self.active.values().any(|a| a.id == id);

        if !taken(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|id| !taken(id))
            .unwrap_or(base)
    }

    /// Resolve the open alert with deduplication key `key`
    pub(super) fn resolve_key(&mut self, key: &str) -> Option<HealthAlert> {
        let alert = self.active.remove(key)?;
        Some(self.archive(alert))
    }

    /// Resolve the open alert with id `id`
    pub(super) fn resolve_id(&mut self, id: &str) -> Option<HealthAlert> {
        let key = self
            .active
            .iter()
            .find(|(_, alert)| alert.id == id)
            .map(|(key, _)| key.clone())?;
        self.resolve_key(&key)
    }

    fn archive(&mut self, mut alert: HealthAlert) -> HealthAlert {
        alert.resolved = true;
        alert.resolved_at = Some(chrono::Utc::now());
        self.history.push_bounded(alert.clone(), self.history_limit);
        alert
    }

    pub(super) fn is_active(&self, key: &str) -> bool {
        self.active.contains_key(key)
    }

    /// Open alerts, oldest first
    pub(super) fn active(&self) -> Vec<HealthAlert> {
        let mut alerts: Vec<HealthAlert> = self.active.values().cloned().collect();
        alerts.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        alerts
    }

    /// Resolved alerts, oldest first
    pub(super) fn history(&self) -> Vec<HealthAlert> {
        self.history.iter().cloned().collect()
    }
}
