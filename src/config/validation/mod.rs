//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `monitoring_validators`: Validators for every configuration section
//! - `tests`: Test suite for all validators

mod monitoring_validators;
mod tests;
mod trait_def;

pub use trait_def::Validate;
