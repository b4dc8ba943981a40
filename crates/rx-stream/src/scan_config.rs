use std::time::Duration;

/// Configuration for the periodic alert scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Interval between scan ticks
    pub scan_interval: Duration,
    /// Expiry alert window in days, inclusive
    pub expiry_window_days: i64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(10),
            expiry_window_days: 30,
        }
    }
}
