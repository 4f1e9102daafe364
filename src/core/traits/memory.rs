//! Memory usage probe

/// Reports memory pressure for the system metrics
#[cfg_attr(test, mockall::automock)]
pub trait MemoryProbe: Send + Sync {
    /// Used memory as a percentage of total memory
    fn memory_usage_percent(&self) -> f64;
}
