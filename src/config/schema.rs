//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for a guarded dependency and its probe runner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Circuit breaker thresholds.
    pub breaker: BreakerConfig,

    /// Downstream endpoint probed through the breaker.
    pub probe: ProbeConfig,

    /// Backoff applied by the caller while the circuit is open.
    pub backoff: BackoffConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Name of the guarded dependency, used in logs and fast-fail errors.
    pub name: String,

    /// Consecutive failures that open the circuit. Must be at least 1.
    pub max_failures: u32,

    /// Time the circuit stays open before a probe is let through, in milliseconds.
    pub reset_timeout_ms: u64,
}

impl BreakerConfig {
    pub fn reset_timeout(&self) -> Duration {
        Duration::from_millis(self.reset_timeout_ms)
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            name: "downstream".to_string(),
            max_failures: 3,
            reset_timeout_ms: 30_000,
        }
    }
}

/// HTTP probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// URL requested on every probe round.
    pub url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Delay between rounds while the circuit admits calls, in milliseconds.
    pub interval_ms: u64,

    /// Number of rounds to run (0 = until shutdown).
    pub attempts: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/health".to_string(),
            timeout_secs: 5,
            interval_ms: 1_000,
            attempts: 0,
        }
    }
}

/// Exponential backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 100,
            max_delay_ms: 5_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GuardConfig::default();
        assert_eq!(config.breaker.max_failures, 3);
        assert_eq!(config.breaker.reset_timeout(), Duration::from_secs(30));
        assert_eq!(config.probe.attempts, 0);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GuardConfig = toml::from_str(
            r#"
            [breaker]
            name = "users-api"
            reset_timeout_ms = 10000
            "#,
        )
        .unwrap();

        assert_eq!(config.breaker.name, "users-api");
        assert_eq!(config.breaker.max_failures, 3);
        assert_eq!(config.breaker.reset_timeout(), Duration::from_secs(10));
        assert_eq!(config.backoff.max_delay_ms, 5_000);
    }
}
