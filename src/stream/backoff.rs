//! Reconnect delay policy.

use std::time::Duration;

use rand::Rng;

use crate::models::StreamConfig;

/// Exponents beyond this would overflow well past any sane cap.
const MAX_EXPONENT: u32 = 16;

/// Capped exponential backoff with uniform jitter.
///
/// The delay before reconnect attempt `n` (1-based) is
/// `min(max_delay, base_delay * 2^(n-1))`, scaled by a random factor in
/// `[1 - jitter, 1 + jitter]` and clamped to `max_delay`. Jitter keeps a
/// fleet of clients from reconnecting in lockstep.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30000),
            jitter: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Build a policy from stream configuration.
    pub fn from_config(config: &StreamConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter: config.jitter,
        }
    }

    /// Delay before reconnect attempt `attempt` (1-based).
    ///
    /// Never exceeds `max_delay`, jitter included.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let max_ms = self.max_delay.as_millis() as u64;
        let exponent = attempt.saturating_sub(1).min(MAX_EXPONENT);
        let raw_ms = (self.base_delay.as_millis() as u64)
            .saturating_mul(1u64 << exponent)
            .min(max_ms);

        let delayed_ms = if self.jitter > 0.0 {
            let factor = rand::thread_rng().gen_range(1.0 - self.jitter..=1.0 + self.jitter);
            (raw_ms as f64 * factor) as u64
        } else {
            raw_ms
        };

        Duration::from_millis(delayed_ms.min(max_ms))
    }
}
