//! Error handling for the monitoring layer
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for the monitoring layer
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the monitoring layer
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Relational store errors
    #[error("Database error: {0}")]
    Database(String),

    /// Cache collaborator errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Reservation metrics collaborator errors
    #[error("Reservation monitoring error: {0}")]
    Reservation(String),

    /// Health check errors
    #[error("Health check error: {0}")]
    HealthCheck(String),

    /// Service initialization errors
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MonitorError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database(message.into())
    }

    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache(message.into())
    }

    pub fn reservation<S: Into<String>>(message: S) -> Self {
        Self::Reservation(message.into())
    }

    pub fn health_check<S: Into<String>>(message: S) -> Self {
        Self::HealthCheck(message.into())
    }

    pub fn initialization<S: Into<String>>(message: S) -> Self {
        Self::Initialization(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Stable short name of the error variant, recorded as the `error_type`
    /// of failed performance samples.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Database(_) => "DatabaseError",
            Self::Cache(_) => "CacheError",
            Self::Reservation(_) => "ReservationError",
            Self::HealthCheck(_) => "HealthCheckError",
            Self::Initialization(_) => "InitializationError",
            Self::Serialization(_) => "SerializationError",
            Self::Yaml(_) => "YamlError",
            Self::Io(_) => "IoError",
            Self::NotFound(_) => "NotFoundError",
            Self::Internal(_) => "InternalError",
        }
    }
}
