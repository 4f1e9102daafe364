//! Service initialization and shutdown
//!
//! Brings up caching, health monitoring, performance recording and the
//! reservation monitoring hooks in order, registers shutdown signal handling
//! and a panic forwarder, and tears everything down again.

mod service;
mod signals;
mod types;


pub use service::{ALREADY_INITIALIZED, PerformanceInitializationService, ServiceDependencies};
pub use signals::{ChannelSignalSource, OsSignalSource, SignalSource, SignalTrigger};
pub use types::{InitializationResult, ServicesStatus};
