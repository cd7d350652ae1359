//! Exponential backoff with jitter.
//!
//! The breaker never retries on its own. Callers that retry above it use this
//! to space attempts out, typically while the circuit is open.

use rand::Rng;
use std::time::Duration;

use crate::config::BackoffConfig;

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` is 1-based; attempt 0 yields no delay.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

impl BackoffConfig {
    /// Delay before retry number `attempt` under this configuration.
    pub fn delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        assert_eq!(calculate_backoff(0, 100, 2000), Duration::ZERO);

        let b1 = calculate_backoff(1, 100, 2000);
        assert!(b1.as_millis() >= 100 && b1.as_millis() < 110);

        let b2 = calculate_backoff(2, 100, 2000);
        assert!(b2.as_millis() >= 200);

        let max = calculate_backoff(10, 100, 1000);
        assert!(max.as_millis() >= 1000 && max.as_millis() < 1100);
    }

    #[test]
    fn test_backoff_saturates() {
        let huge = calculate_backoff(u32::MAX, u64::MAX, 5_000);
        assert!(huge.as_millis() >= 5_000);
    }

    #[test]
    fn test_config_delay() {
        let config = BackoffConfig {
            base_delay_ms: 50,
            max_delay_ms: 60,
        };
        assert!(config.delay(3).as_millis() >= 60);
    }
}
