//! Integration tests for loft-monitor
//!
//! These tests run the monitoring services against the in-memory store,
//! the moka-backed loft cache and the reservation tracker, without mocking.

pub mod health_tests;
pub mod initialization_tests;
pub mod performance_tests;
