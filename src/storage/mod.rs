//! In-process storage backends
//!
//! This module provides the relational store and the loft cache used when the
//! monitoring layer runs standalone or under test.

/// Moka-backed loft cache
pub mod cache;
/// In-memory relational store
pub mod memory;

pub use cache::{LoftCache, LoftCacheConfig};
pub use memory::{InMemoryStore, Procedure, Tables};
