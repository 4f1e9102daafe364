//! Host memory sampling using the sysinfo crate
//!
//! Without the `metrics` feature the probe reports zero usage.

use crate::core::traits::MemoryProbe;
#[cfg(feature = "metrics")]
use parking_lot::Mutex;
#[cfg(feature = "metrics")]
use sysinfo::System;

/// Memory probe backed by the operating system
#[derive(Debug)]
pub struct SystemMemoryProbe {
    #[cfg(feature = "metrics")]
    system: Mutex<System>,
}

impl SystemMemoryProbe {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "metrics")]
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "metrics")]
impl MemoryProbe for SystemMemoryProbe {
    fn memory_usage_percent(&self) -> f64 {
        let mut sys = self.system.lock();
        sys.refresh_memory();

        let total = sys.total_memory();
        if total == 0 {
            return 0.0;
        }
        sys.used_memory() as f64 / total as f64 * 100.0
    }
}

#[cfg(not(feature = "metrics"))]
impl MemoryProbe for SystemMemoryProbe {
    fn memory_usage_percent(&self) -> f64 {
        0.0
    }
}
