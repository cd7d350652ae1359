//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breakers and the probe runner produce:
//!     → tracing events (state transitions, probe outcomes)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, text or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured fields (breaker name, state, failures) for machine parsing
//! - Errors are returned to callers, not logged by the breaker

pub mod logging;
