//! Core abstractions shared across the monitoring layer

pub mod traits;
