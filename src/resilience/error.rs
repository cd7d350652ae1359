//! Errors surfaced by a guarded call.
//!
//! A call either fails fast because the circuit is open, or fails because the
//! wrapped operation failed. The two are kept apart so callers can pick a
//! different strategy for each.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Fast-fail signal synthesized by the breaker itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circuit breaker is open - {name} unavailable")]
pub struct CircuitOpen {
    /// Name of the guarded dependency.
    pub name: String,
}

/// Outcome of a guarded call that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError<E> {
    /// The circuit is open; the operation was not invoked.
    Open(CircuitOpen),
    /// The operation ran and returned this error, unchanged.
    Inner(E),
}

impl<E> CallError<E> {
    /// True when the call was rejected without invoking the operation.
    pub fn is_open(&self) -> bool {
        matches!(self, CallError::Open(_))
    }

    /// Borrow the downstream error, if there is one.
    pub fn inner(&self) -> Option<&E> {
        match self {
            CallError::Inner(e) => Some(e),
            CallError::Open(_) => None,
        }
    }

    /// Take the downstream error, if there is one.
    pub fn into_inner(self) -> Option<E> {
        match self {
            CallError::Inner(e) => Some(e),
            CallError::Open(_) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for CallError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Open(open) => write!(f, "{}", open),
            CallError::Inner(e) => write!(f, "{}", e),
        }
    }
}

impl<E: StdError + 'static> StdError for CallError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CallError::Open(open) => Some(open),
            CallError::Inner(e) => Some(e),
        }
    }
}
