//! Circuit breaker for downstream protection.
//!
//! # Responsibilities
//! - Gate every call to a fallible operation on recent failure history
//! - Count consecutive failures and open the circuit at the threshold
//! - Let one probe through after the reset timeout and close on success
//! - Expose the current state and failure count for introspection
//!
//! # Design Decisions
//! - One `RwLock` per breaker; the write lock spans decide → invoke → update,
//!   so a slow operation serializes every other caller of the same breaker
//! - Reads (`state`, `failures`) take the shared lock and never mutate
//! - Fast-fail returns [`CallError::Open`]; downstream errors pass through untouched
//! - No retries, no timers: the caller owns retry and timeout policy

use std::num::NonZeroU32;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;

use crate::config::{BreakerConfig, ConfigError};
use crate::config::validation::validate_breaker;
use crate::resilience::clock::{Clock, SystemClock};
use crate::resilience::error::{CallError, CircuitOpen};
use crate::resilience::state::{BreakerCore, CircuitState, Transition};

/// Point-in-time view of a breaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: CircuitState,
    pub failures: u32,
}

/// Immutable breaker settings shared by the sync and async front-ends.
#[derive(Debug, Clone)]
pub(crate) struct BreakerSettings {
    pub(crate) name: String,
    pub(crate) max_failures: NonZeroU32,
    pub(crate) reset_timeout: Duration,
}

impl BreakerSettings {
    pub(crate) fn new(max_failures: NonZeroU32, reset_timeout: Duration) -> Self {
        Self {
            name: "downstream".to_string(),
            max_failures,
            reset_timeout,
        }
    }

    pub(crate) fn from_config(config: &BreakerConfig) -> Result<Self, ConfigError> {
        let errors = validate_breaker(config);
        let max_failures = match NonZeroU32::new(config.max_failures) {
            Some(n) if errors.is_empty() => n,
            _ => return Err(ConfigError::Validation(errors)),
        };
        Ok(Self {
            name: config.name.clone(),
            max_failures,
            reset_timeout: config.reset_timeout(),
        })
    }

    pub(crate) fn open_error(&self) -> CircuitOpen {
        CircuitOpen {
            name: self.name.clone(),
        }
    }

    pub(crate) fn snapshot(&self, core: &BreakerCore) -> BreakerSnapshot {
        BreakerSnapshot {
            name: self.name.clone(),
            state: core.state,
            failures: core.failures,
        }
    }

    pub(crate) fn log_transition(&self, transition: Option<Transition>, failures: u32) {
        let Some(Transition { from, to }) = transition else {
            return;
        };
        match to {
            CircuitState::Open => tracing::warn!(
                breaker = %self.name,
                from = %from,
                failures,
                reset_timeout_ms = self.reset_timeout.as_millis() as u64,
                "Circuit opened"
            ),
            CircuitState::HalfOpen => tracing::info!(
                breaker = %self.name,
                "Circuit half-open, admitting probe"
            ),
            CircuitState::Closed => tracing::info!(
                breaker = %self.name,
                from = %from,
                "Circuit closed, dependency recovered"
            ),
        }
    }
}

/// Thread-safe circuit breaker guarding a synchronous operation.
#[derive(Debug)]
pub struct CircuitBreaker<C: Clock = SystemClock> {
    settings: BreakerSettings,
    core: RwLock<BreakerCore>,
    clock: C,
}

impl CircuitBreaker<SystemClock> {
    /// Create a breaker that opens after `max_failures` consecutive failures
    /// and probes again once `reset_timeout` has passed since the last one.
    pub fn new(max_failures: NonZeroU32, reset_timeout: Duration) -> Self {
        Self::with_clock(max_failures, reset_timeout, SystemClock)
    }

    /// Build a breaker from validated configuration.
    pub fn from_config(config: &BreakerConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_clock(config, SystemClock)
    }
}

impl<C: Clock> CircuitBreaker<C> {
    /// Create a breaker measuring the reset timeout against `clock`.
    pub fn with_clock(max_failures: NonZeroU32, reset_timeout: Duration, clock: C) -> Self {
        Self::from_settings(BreakerSettings::new(max_failures, reset_timeout), clock)
    }

    pub fn from_config_with_clock(config: &BreakerConfig, clock: C) -> Result<Self, ConfigError> {
        Ok(Self::from_settings(BreakerSettings::from_config(config)?, clock))
    }

    fn from_settings(settings: BreakerSettings, clock: C) -> Self {
        Self {
            settings,
            core: RwLock::new(BreakerCore::new()),
            clock,
        }
    }

    /// Set the dependency name used in logs and fast-fail errors.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.settings.name = name.into();
        self
    }

    /// Run `operation` if the circuit admits it.
    ///
    /// The operation is invoked at most once, on the calling thread, while the
    /// breaker's write lock is held. If it panics, the lock is released and no
    /// outcome is recorded.
    pub fn call<T, E, F>(&self, operation: F) -> Result<T, CallError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut core = self.core.write().unwrap_or_else(PoisonError::into_inner);

        match core.admit(self.clock.now(), self.settings.reset_timeout) {
            Ok(transition) => self.settings.log_transition(transition, core.failures),
            Err(_) => {
                tracing::debug!(breaker = %self.settings.name, "Circuit open, failing fast");
                return Err(CallError::Open(self.settings.open_error()));
            }
        }

        match operation() {
            Ok(value) => {
                let transition = core.record_success();
                self.settings.log_transition(transition, core.failures);
                Ok(value)
            }
            Err(e) => {
                let transition =
                    core.record_failure(self.clock.now(), self.settings.max_failures.get());
                self.settings.log_transition(transition, core.failures);
                Err(CallError::Inner(e))
            }
        }
    }

    /// Current circuit state.
    pub fn state(&self) -> CircuitState {
        self.read().state
    }

    /// Current consecutive failure count.
    pub fn failures(&self) -> u32 {
        self.read().failures
    }

    pub fn is_open(&self) -> bool {
        self.state() == CircuitState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state() == CircuitState::Closed
    }

    pub fn is_half_open(&self) -> bool {
        self.state() == CircuitState::HalfOpen
    }

    /// State and failure count read under one lock acquisition.
    pub fn snapshot(&self) -> BreakerSnapshot {
        let core = self.read();
        self.settings.snapshot(&core)
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn max_failures(&self) -> NonZeroU32 {
        self.settings.max_failures
    }

    pub fn reset_timeout(&self) -> Duration {
        self.settings.reset_timeout
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BreakerCore> {
        self.core.read().unwrap_or_else(PoisonError::into_inner)
    }
}
