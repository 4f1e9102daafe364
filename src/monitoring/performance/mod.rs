//! Performance recording and reporting
//!
//! Timers are opened around reservation-path operations, closed into
//! immutable samples kept in a bounded buffer, and aggregated on demand into
//! windowed reports with percentile, per-operation and cache statistics.

mod background;
mod bounded;
mod helpers;
mod recorder;
mod report;
mod types;
mod wrappers;


pub(crate) use bounded::BoundedPush;
pub use recorder::PerformanceMonitor;
pub use types::{
    CACHE_HIT_KEY, CachePerformance, Context, OperationBreakdown, PerformanceReport,
    PerformanceSample, RealTimeStats, SweepOutcome,
};
pub use wrappers::ErrorKind;
