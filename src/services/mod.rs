//! Services module
//!
//! This module contains the reservation tracking service that feeds the
//! reservation health check.

pub mod reservation_tracker;

pub use reservation_tracker::{
    BehaviorEvent, LOFT_VIEW_EVENT, ReservationAttempt, ReservationTracker, SECURITY_ERROR_TYPE,
};
