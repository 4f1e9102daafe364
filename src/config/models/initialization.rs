//! Service initialization configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
            Environment::Test => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Which services the orchestrator brings up and how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializationConfig {
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
    /// Run the cache smoke test
    #[serde(default = "default_true")]
    pub enable_caching: bool,
    /// Warm the cache after the smoke test
    #[serde(default = "default_true")]
    pub enable_cache_warmup: bool,
    /// Loft ids loaded during warm-up
    #[serde(default)]
    pub warmup_loft_ids: Vec<String>,
    /// Start periodic health checks
    #[serde(default = "default_true")]
    pub enable_health_monitoring: bool,
    /// Health check interval in seconds
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval_secs: u64,
    /// Start the performance recorder
    #[serde(default = "default_true")]
    pub enable_performance_monitoring: bool,
    /// Run the reservation monitoring smoke test
    #[serde(default = "default_true")]
    pub enable_reservation_monitoring: bool,
    /// Forward panics to the reservation error tracker
    #[serde(default = "default_true")]
    pub install_panic_hook: bool,
    /// Shut down on SIGTERM/SIGINT
    #[serde(default = "default_true")]
    pub handle_signals: bool,
}

impl Default for InitializationConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            enable_caching: true,
            enable_cache_warmup: true,
            warmup_loft_ids: Vec::new(),
            enable_health_monitoring: true,
            health_check_interval_secs: default_health_check_interval(),
            enable_performance_monitoring: true,
            enable_reservation_monitoring: true,
            install_panic_hook: true,
            handle_signals: true,
        }
    }
}

impl InitializationConfig {
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }

    /// Apply the fields set in `update`, leaving the others untouched
    pub fn apply(&mut self, update: InitializationConfigUpdate) {
        if let Some(environment) = update.environment {
            self.environment = environment;
        }
        if let Some(enabled) = update.enable_caching {
            self.enable_caching = enabled;
        }
        if let Some(enabled) = update.enable_cache_warmup {
            self.enable_cache_warmup = enabled;
        }
        if let Some(ids) = update.warmup_loft_ids {
            self.warmup_loft_ids = ids;
        }
        if let Some(enabled) = update.enable_health_monitoring {
            self.enable_health_monitoring = enabled;
        }
        if let Some(secs) = update.health_check_interval_secs {
            self.health_check_interval_secs = secs;
        }
        if let Some(enabled) = update.enable_performance_monitoring {
            self.enable_performance_monitoring = enabled;
        }
        if let Some(enabled) = update.enable_reservation_monitoring {
            self.enable_reservation_monitoring = enabled;
        }
    }
}

/// Partial update for [`InitializationConfig`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitializationConfigUpdate {
    pub environment: Option<Environment>,
    pub enable_caching: Option<bool>,
    pub enable_cache_warmup: Option<bool>,
    pub warmup_loft_ids: Option<Vec<String>>,
    pub enable_health_monitoring: Option<bool>,
    pub health_check_interval_secs: Option<u64>,
    pub enable_performance_monitoring: Option<bool>,
    pub enable_reservation_monitoring: Option<bool>,
}
