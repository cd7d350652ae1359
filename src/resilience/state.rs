//! Circuit state machine.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: one probe call tests whether the dependency recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: failures >= max_failures
//! Open → Half-Open: next call after reset_timeout has elapsed since the last failure
//! Half-Open → Closed: probe call succeeds
//! Half-Open → Open: probe call fails (regardless of the failure count)
//! ```
//!
//! # Design Decisions
//! - Transitions are lazy: evaluated when a call arrives, never by a timer
//! - Bookkeeping is plain data; locking lives in the breaker front-ends
//! - Every state change is reported back so the caller can log it

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Health state of a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Calls flow through.
    #[default]
    Closed,
    /// Calls fail fast without reaching the dependency.
    Open,
    /// A probe call is allowed through to test recovery.
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        };
        f.write_str(s)
    }
}

/// A state change produced by one step of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CircuitState,
    pub to: CircuitState,
}

/// Marker returned by [`BreakerCore::admit`] when the circuit is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rejected;

/// Mutable breaker bookkeeping. Always accessed under the breaker's lock.
#[derive(Debug, Clone, Default)]
pub(crate) struct BreakerCore {
    pub(crate) state: CircuitState,
    pub(crate) failures: u32,
    pub(crate) last_failure: Option<Instant>,
}

impl BreakerCore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decide whether a call may proceed.
    ///
    /// An open circuit whose reset timeout has strictly elapsed moves to
    /// half-open and clears the failure count before admitting the probe.
    pub(crate) fn admit(
        &mut self,
        now: Instant,
        reset_timeout: Duration,
    ) -> Result<Option<Transition>, Rejected> {
        if self.state != CircuitState::Open {
            return Ok(None);
        }

        let elapsed_past_timeout = match self.last_failure {
            Some(at) => now.saturating_duration_since(at) > reset_timeout,
            // Unreachable through the public API: opening always stamps a failure.
            None => true,
        };

        if !elapsed_past_timeout {
            return Err(Rejected);
        }

        self.failures = 0;
        Ok(self.set_state(CircuitState::HalfOpen))
    }

    /// Record a failed call; opens the circuit once the threshold is reached.
    ///
    /// A failed half-open probe always reopens: the probe is the only call the
    /// half-open circuit admits.
    pub(crate) fn record_failure(&mut self, now: Instant, max_failures: u32) -> Option<Transition> {
        self.failures = self.failures.saturating_add(1);
        self.last_failure = Some(now);

        if self.state == CircuitState::HalfOpen || self.failures >= max_failures {
            self.set_state(CircuitState::Open)
        } else {
            None
        }
    }

    /// Record a successful call.
    pub(crate) fn record_success(&mut self) -> Option<Transition> {
        self.failures = 0;
        if self.state == CircuitState::HalfOpen {
            self.set_state(CircuitState::Closed)
        } else {
            None
        }
    }

    fn set_state(&mut self, to: CircuitState) -> Option<Transition> {
        let from = self.state;
        if from == to {
            return None;
        }
        self.state = to;
        Some(Transition { from, to })
    }
}
