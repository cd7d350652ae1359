//! Periodic probing through a circuit breaker.
//!
//! # Responsibilities
//! - Call the probe through the breaker once per round
//! - Report every round's outcome together with the breaker state
//! - Back off while the circuit is open, probe on the interval otherwise
//! - Stop after the configured number of rounds or on shutdown

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::{BackoffConfig, ConfigError, GuardConfig};
use crate::probe::http::{HttpProbe, ProbeError};
use crate::resilience::{AsyncCircuitBreaker, BreakerSnapshot, CallError, Clock, SystemClock};

/// Error building a runner from configuration.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// What happened to one guarded probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The probe ran and the endpoint answered 2xx.
    Success { status: u16 },
    /// The probe ran and failed.
    Failure { error: String },
    /// The circuit was open; the endpoint was not contacted.
    Rejected,
}

/// Result of one round.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub attempt: u32,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    pub breaker: BreakerSnapshot,
}

/// Drives an [`HttpProbe`] through an [`AsyncCircuitBreaker`].
pub struct ProbeRunner<C: Clock = SystemClock> {
    probe: HttpProbe,
    breaker: Arc<AsyncCircuitBreaker<C>>,
    interval: Duration,
    attempts: u32,
    backoff: BackoffConfig,
}

impl ProbeRunner<SystemClock> {
    /// Build the probe and its breaker from a validated configuration.
    pub fn from_config(config: &GuardConfig) -> Result<Self, RunnerError> {
        let breaker = Arc::new(AsyncCircuitBreaker::from_config(&config.breaker)?);
        let probe = HttpProbe::new(&config.probe)?;
        Ok(Self::new(probe, breaker, config))
    }
}

impl<C: Clock> ProbeRunner<C> {
    pub fn new(probe: HttpProbe, breaker: Arc<AsyncCircuitBreaker<C>>, config: &GuardConfig) -> Self {
        Self {
            probe,
            breaker,
            interval: Duration::from_millis(config.probe.interval_ms),
            attempts: config.probe.attempts,
            backoff: config.backoff.clone(),
        }
    }

    pub fn breaker(&self) -> &Arc<AsyncCircuitBreaker<C>> {
        &self.breaker
    }

    /// Run a single guarded probe.
    pub async fn round(&self, attempt: u32) -> ProbeReport {
        let result = self.breaker.call(|| self.probe.check()).await;

        let outcome = match result {
            Ok(status) => ProbeOutcome::Success { status },
            Err(CallError::Open(_)) => ProbeOutcome::Rejected,
            Err(CallError::Inner(e)) => {
                tracing::debug!(
                    breaker = %self.breaker.name(),
                    url = %self.probe.url(),
                    error = %e,
                    "Probe failed"
                );
                ProbeOutcome::Failure { error: e.to_string() }
            }
        };

        ProbeReport {
            attempt,
            outcome,
            breaker: self.breaker.snapshot().await,
        }
    }

    /// Probe until the attempt budget is spent or shutdown is signalled.
    ///
    /// Returns the number of rounds run.
    pub async fn run<F>(&self, mut shutdown: broadcast::Receiver<()>, mut on_report: F) -> u32
    where
        F: FnMut(&ProbeReport),
    {
        tracing::info!(
            breaker = %self.breaker.name(),
            url = %self.probe.url(),
            interval_ms = self.interval.as_millis() as u64,
            attempts = self.attempts,
            "Probe runner starting"
        );

        let mut rounds = 0u32;
        let mut rejected_streak = 0u32;
        // Cleared once every shutdown sender is gone; the attempt budget then decides.
        let mut shutdown_open = true;

        loop {
            rounds = next_attempt(rounds);
            let report = self.round(rounds).await;
            on_report(&report);

            if self.attempts > 0 && rounds >= self.attempts {
                break;
            }

            let delay = if report.outcome == ProbeOutcome::Rejected {
                rejected_streak = rejected_streak.saturating_add(1);
                self.backoff.delay(rejected_streak)
            } else {
                rejected_streak = 0;
                self.interval
            };

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    _ = &mut sleep => break,
                    signal = shutdown.recv(), if shutdown_open => match signal {
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::debug!("Shutdown channel closed, running to attempt budget");
                            shutdown_open = false;
                        }
                        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            tracing::info!("Probe runner received shutdown signal, exiting loop");
                            return rounds;
                        }
                    },
                }
            }
        }

        rounds
    }
}

/// Attempt numbers stick at `u32::MAX` on unbounded runs instead of wrapping.
fn next_attempt(rounds: u32) -> u32 {
    rounds.saturating_add(1)
}
