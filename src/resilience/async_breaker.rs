//! Circuit breaker for async operations.
//!
//! Same state machine and lock scope as [`CircuitBreaker`](super::circuit_breaker::CircuitBreaker),
//! but the lock is a `tokio::sync::RwLock` so it can be held across the
//! awaited downstream call without blocking the runtime.
//!
//! Dropping a `call` future before the operation finishes releases the lock
//! and records no outcome.

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::config::{BreakerConfig, ConfigError};
use crate::resilience::circuit_breaker::{BreakerSettings, BreakerSnapshot};
use crate::resilience::clock::{Clock, SystemClock};
use crate::resilience::error::CallError;
use crate::resilience::state::{BreakerCore, CircuitState};

/// Circuit breaker guarding an async operation.
#[derive(Debug)]
pub struct AsyncCircuitBreaker<C: Clock = SystemClock> {
    settings: BreakerSettings,
    core: RwLock<BreakerCore>,
    clock: C,
}

impl AsyncCircuitBreaker<SystemClock> {
    pub fn new(max_failures: NonZeroU32, reset_timeout: Duration) -> Self {
        Self::with_clock(max_failures, reset_timeout, SystemClock)
    }

    pub fn from_config(config: &BreakerConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_clock(config, SystemClock)
    }
}

impl<C: Clock> AsyncCircuitBreaker<C> {
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

    /// Run `operation` if the circuit admits it, awaiting it under the write lock.
    pub async fn call<T, E, F, Fut>(&self, operation: F) -> Result<T, CallError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut core = self.core.write().await;

        match core.admit(self.clock.now(), self.settings.reset_timeout) {
            Ok(transition) => self.settings.log_transition(transition, core.failures),
            Err(_) => {
                tracing::debug!(breaker = %self.settings.name, "Circuit open, failing fast");
                return Err(CallError::Open(self.settings.open_error()));
            }
        }

        match operation().await {
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

    pub async fn state(&self) -> CircuitState {
        self.core.read().await.state
    }

    pub async fn failures(&self) -> u32 {
        self.core.read().await.failures
    }

    pub async fn is_open(&self) -> bool {
        self.state().await == CircuitState::Open
    }

    pub async fn is_closed(&self) -> bool {
        self.state().await == CircuitState::Closed
    }

    pub async fn is_half_open(&self) -> bool {
        self.state().await == CircuitState::HalfOpen
    }

    pub async fn snapshot(&self) -> BreakerSnapshot {
        let core = self.core.read().await;
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
}
