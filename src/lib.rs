//! Circuit breaker guard for unreliable downstream dependencies.
//!
//! # Architecture Overview
//!
//! ```text
//!     Caller                    ┌──────────────────────────────────────┐
//!     ──────────────────────────┼─▶ CircuitBreaker / AsyncCircuitBreaker│
//!                               │     │ admit? ── no ──▶ CallError::Open │
//!                               │     ▼ yes                             │
//!                               │   operation() ──▶ downstream service ─┼──▶
//!                               │     │                                 │
//!                               │     ▼                                 │
//!     ◀─────────────────────────┼── record success / failure            │
//!     Ok(T) or CallError::Inner │   (Closed → Open → HalfOpen → ...)    │
//!                               └──────────────────────────────────────┘
//!
//!     Cross-cutting: config (TOML), observability (tracing), probe (HTTP runner)
//! ```
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroU32;
//! use std::time::Duration;
//! use circuit_guard::resilience::{CallError, CircuitBreaker, CircuitState};
//!
//! let breaker = CircuitBreaker::new(NonZeroU32::new(3).unwrap(), Duration::from_secs(10))
//!     .named("users-api");
//!
//! let result: Result<(), CallError<&str>> = breaker.call(|| Err("connection refused"));
//! assert!(matches!(result, Err(CallError::Inner("connection refused"))));
//! assert_eq!(breaker.state(), CircuitState::Closed);
//! assert_eq!(breaker.failures(), 1);
//! ```

pub mod config;
pub mod observability;
pub mod probe;
pub mod resilience;

pub use config::GuardConfig;
pub use resilience::{AsyncCircuitBreaker, CallError, CircuitBreaker, CircuitState};
