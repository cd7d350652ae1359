//! Guarded HTTP probing.
//!
//! # Data Flow
//! ```text
//! ProbeRunner tick
//!     → AsyncCircuitBreaker::call
//!         → HttpProbe::check (GET url, non-2xx = failure)
//!     → ProbeReport (outcome + breaker snapshot)
//!     → sleep interval, or back off while the circuit is open
//! ```
//!
//! # Design Decisions
//! - Transport errors, timeouts and non-2xx statuses all count as failures
//! - Retry pacing lives here, above the breaker, never inside it
//! - Shutdown is a broadcast signal so several runners can share one trigger

pub mod http;
pub mod runner;

pub use http::{HttpProbe, ProbeError};
pub use runner::{ProbeOutcome, ProbeReport, ProbeRunner, RunnerError};
