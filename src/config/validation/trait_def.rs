//! The `Validate` trait shared by the configuration sections
//!
//! Performance, health, initialization and logging sections each implement
//! it; `Config::validate` prefixes the returned message with the section name.

/// A configuration section that can reject invalid values
pub trait Validate {
    /// Describe the first invalid value, if any
    fn validate(&self) -> Result<(), String>;
}
