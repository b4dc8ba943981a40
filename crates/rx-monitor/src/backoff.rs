use std::time::Duration;

// Reconnect defaults match the broadcaster's observed client behavior:
// 1s base delay doubling per attempt, capped at 30s, at most 5 automatic
// attempts before the consumer has to reconnect explicitly.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_BASE_DELAY_SECS: u64 = 1;
const DEFAULT_MAX_DELAY_SECS: u64 = 30;

/// Bounded exponential backoff policy for automatic reconnects
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Maximum number of automatic reconnect attempts
    pub max_attempts: u32,
    /// Delay before the first reconnect
    pub base_delay: Duration,
    /// Ceiling for the exponential delay
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(DEFAULT_BASE_DELAY_SECS),
            max_delay: Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt number `attempts` (zero-based count
    /// of attempts already made). `None` once the ceiling is reached.
    pub fn delay_for(&self, attempts: u32) -> Option<Duration> {
        if attempts >= self.max_attempts {
            return None;
        }

        let factor = 2u32.saturating_pow(attempts);
        let delay = self.base_delay.saturating_mul(factor);
        Some(delay.min(self.max_delay))
    }
}
