//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds >= 1, timeouts > 0)
//! - Validate the probe URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{BackoffConfig, BreakerConfig, GuardConfig, ObservabilityConfig, ProbeConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("breaker.name must not be empty")]
    EmptyBreakerName,

    #[error("breaker.max_failures must be at least 1 (got {0})")]
    NonPositiveMaxFailures(u32),

    #[error("breaker.reset_timeout_ms must be greater than 0")]
    ZeroResetTimeout,

    #[error("probe.url is invalid: {0}")]
    InvalidUrl(String),

    #[error("probe.{0} must be greater than 0")]
    ZeroProbeSetting(&'static str),

    #[error("backoff.base_delay_ms ({base}) exceeds backoff.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a full configuration, collecting every problem found.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    errors.extend(validate_breaker(&config.breaker));
    validate_probe(&config.probe, &mut errors);
    validate_backoff(&config.backoff, &mut errors);
    validate_observability(&config.observability, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate breaker thresholds on their own.
///
/// Used when a breaker is built from config without the rest of the file.
pub fn validate_breaker(config: &BreakerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.name.trim().is_empty() {
        errors.push(ValidationError::EmptyBreakerName);
    }
    if config.max_failures == 0 {
        errors.push(ValidationError::NonPositiveMaxFailures(config.max_failures));
    }
    if config.reset_timeout_ms == 0 {
        errors.push(ValidationError::ZeroResetTimeout);
    }
    errors
}

fn validate_probe(config: &ProbeConfig, errors: &mut Vec<ValidationError>) {
    match Url::parse(&config.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        ))),
        Err(e) => errors.push(ValidationError::InvalidUrl(e.to_string())),
    }
    if config.timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeSetting("timeout_secs"));
    }
    if config.interval_ms == 0 {
        errors.push(ValidationError::ZeroProbeSetting("interval_ms"));
    }
}

fn validate_backoff(config: &BackoffConfig, errors: &mut Vec<ValidationError>) {
    if config.base_delay_ms > config.max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: config.base_delay_ms,
            max: config.max_delay_ms,
        });
    }
}

fn validate_observability(config: &ObservabilityConfig, errors: &mut Vec<ValidationError>) {
    let level = config.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.log_level.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GuardConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GuardConfig::default();
        config.breaker.max_failures = 0;
        config.breaker.reset_timeout_ms = 0;
        config.probe.url = "not a url".into();
        config.backoff.base_delay_ms = 10_000;
        config.observability.log_level = "verbose".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::NonPositiveMaxFailures(0)));
        assert!(errors.contains(&ValidationError::ZeroResetTimeout));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("verbose".into())));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = GuardConfig::default();
        config.probe.url = "ftp://example.com/health".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidUrl(_)));
    }

    #[test]
    fn test_empty_breaker_name() {
        let config = BreakerConfig {
            name: "  ".into(),
            ..BreakerConfig::default()
        };
        assert_eq!(validate_breaker(&config), vec![ValidationError::EmptyBreakerName]);
    }
}
