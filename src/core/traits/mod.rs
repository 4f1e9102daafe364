//! Collaborator traits consumed by the monitoring layer
//!
//! The monitoring layer never owns the cache, the relational store or the
//! reservation subsystem; it reads them through these seams so that tests and
//! the composition root can plug in any implementation.

pub mod cache;
pub mod memory;
pub mod reservations;
pub mod stats;
pub mod store;

pub use cache::{CacheStats, CacheStatsSource};
pub use memory::MemoryProbe;
pub use reservations::{ReservationErrorReport, ReservationMetrics, ReservationMetricsSource};
pub use stats::{PerformanceStatsSource, ProcessStats};
pub use store::RelationalStore;

#[cfg(test)]
pub use cache::MockCacheStatsSource;
#[cfg(test)]
pub use memory::MockMemoryProbe;
#[cfg(test)]
pub use reservations::MockReservationMetricsSource;
#[cfg(test)]
pub use stats::MockPerformanceStatsSource;
#[cfg(test)]
pub use store::MockRelationalStore;
