//! Tests for configuration validation

#[cfg(test)]
mod tests {
    use super::super::trait_def::Validate;
    use crate::config::models::*;

    #[test]
    fn test_default_sections_are_valid() {
        assert!(PerformanceConfig::default().validate().is_ok());
        assert!(HealthConfig::default().validate().is_ok());
        assert!(InitializationConfig::default().validate().is_ok());
        assert!(LoggingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_performance_config_validation() {
        let mut config = PerformanceConfig {
            max_samples: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.max_samples = 100;
        config.thresholds.insert("loft_search".to_string(), 0);
        let err = config.validate().unwrap_err();
        assert!(err.contains("loft_search"));
    }

    #[test]
    fn test_health_thresholds_ordering() {
        let mut config = HealthConfig::default();
        config.alerts.error_rate = ThresholdPair::new(20.0, 10.0);
        assert!(config.validate().is_err());

        // Hit rate is inverted: the critical floor sits below the warning floor
        let mut config = HealthConfig::default();
        config.alerts.cache_hit_rate = ThresholdPair::new(50.0, 70.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_thresholds_ordering() {
        let mut config = HealthConfig::default();
        config.database.warning_ms = 5000;
        config.database.critical_ms = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initialization_interval_required() {
        let config = InitializationConfig {
            health_check_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = InitializationConfig {
            health_check_interval_secs: 0,
            enable_health_monitoring: false,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
