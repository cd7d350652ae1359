//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → breaker thresholds, probe target, backoff, logging
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; breaker thresholds never change after construction
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BackoffConfig;
pub use schema::BreakerConfig;
pub use schema::GuardConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProbeConfig;
