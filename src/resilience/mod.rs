//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a downstream dependency:
//!     → circuit_breaker.rs / async_breaker.rs (admit, fast-fail when open)
//!     → state.rs (count failures, open / half-open / close)
//!     → clock.rs (measure reset timeout)
//!     → error.rs (circuit-open vs. downstream failure)
//! Caller-side retry (outside the breaker):
//!     → backoff.rs (exponential delay with jitter)
//! ```
//!
//! # Design Decisions
//! - The breaker is per dependency, never global
//! - Time-based recovery is evaluated lazily on the next call, no timers
//! - Circuit-open is a distinct error variant, never derived from a downstream error
//! - Retries and timeouts belong to the caller

pub mod async_breaker;
pub mod backoff;
pub mod circuit_breaker;
pub mod clock;
pub mod error;
pub mod state;

pub use async_breaker::AsyncCircuitBreaker;
pub use circuit_breaker::{BreakerSnapshot, CircuitBreaker};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CallError, CircuitOpen};
pub use state::CircuitState;
