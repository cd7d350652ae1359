//! circuit-guard
//!
//! Probes a downstream HTTP endpoint through a circuit breaker and reports
//! every round: whether the endpoint was reached, and the breaker state.

use std::path::PathBuf;

use clap::Parser;

use circuit_guard::config::validation::validate_config;
use circuit_guard::config::{load_config, ConfigError, GuardConfig};
use circuit_guard::observability::logging;
use circuit_guard::probe::{ProbeOutcome, ProbeRunner};

#[derive(Parser)]
#[command(name = "circuit-guard")]
#[command(about = "Probe a downstream service through a circuit breaker", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the probe URL.
    #[arg(short, long)]
    url: Option<String>,

    /// Override the number of rounds (0 = until Ctrl-C).
    #[arg(short, long)]
    attempts: Option<u32>,

    /// Print each round as a JSON line.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };
    if let Some(url) = cli.url {
        config.probe.url = url;
    }
    if let Some(attempts) = cli.attempts {
        config.probe.attempts = attempts;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        breaker = %config.breaker.name,
        max_failures = config.breaker.max_failures,
        reset_timeout_ms = config.breaker.reset_timeout_ms,
        url = %config.probe.url,
        "Configuration loaded"
    );

    let runner = ProbeRunner::from_config(&config)?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    let json = cli.json;
    let rounds = runner
        .run(shutdown_rx, |report| {
            if json {
                match serde_json::to_string(report) {
                    Ok(line) => println!("{}", line),
                    Err(e) => eprintln!("Failed to encode report: {}", e),
                }
            } else {
                println!(
                    "#{:<4} {:<40} state={} failures={}",
                    report.attempt,
                    describe(&report.outcome),
                    report.breaker.state,
                    report.breaker.failures
                );
            }
        })
        .await;

    tracing::info!(rounds, "Probe runner finished");
    Ok(())
}

fn describe(outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Success { status } => format!("ok ({})", status),
        ProbeOutcome::Failure { error } => format!("failed: {}", error),
        ProbeOutcome::Rejected => "rejected: circuit open".to_string(),
    }
}
