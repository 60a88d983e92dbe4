//! Invocation host for the transcode gateway.
//!
//! Reads one invocation event as JSON from stdin, runs it through the
//! gateway and writes the framed response to stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transcodegate_core::{
    load_config, load_config_from_env, validate_config, Config, DiagnosticTarget, Gateway,
    InvocationEvent,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Points at an optional TOML config file.
const CONFIG_PATH_VAR: &str = "TRANSCODEGATE_CONFIG";

/// Set to `json` for structured log lines.
const LOG_FORMAT_VAR: &str = "TRANSCODEGATE_LOG_FORMAT";

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var(LOG_FORMAT_VAR)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout carries the response, so every log line goes to stderr.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run() -> Result<()> {
    info!(version = VERSION, "Starting transcodegate");

    let config = host_config(load()?);
    validate_config(&config).context("Configuration validation failed")?;

    let event = read_event().await.context("Failed to read invocation event")?;
    let gateway = Gateway::from_config(&config).context("Failed to create gateway")?;

    let outcome = gateway
        .handle(&event.query_parameters(), tokio::io::stdout())
        .await;

    if !outcome.stream_completed {
        warn!(
            invocation_id = %outcome.invocation_id,
            "Response was not fully delivered"
        );
    }
    info!(
        invocation_id = %outcome.invocation_id,
        status = outcome.status_code,
        "Invocation complete"
    );
    Ok(())
}

fn load() -> Result<Config> {
    match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) => load_config_from_env().context("Failed to load config from environment"),
    }
}

/// Keeps engine output off the response channel.
fn host_config(mut config: Config) -> Config {
    if config.engine.stdout == DiagnosticTarget::Stdout {
        config.engine.stdout = DiagnosticTarget::Stderr;
    }
    config
}

/// An empty stdin is an event with no query parameters.
async fn read_event() -> Result<InvocationEvent> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    if input.trim().is_empty() {
        return Ok(InvocationEvent::default());
    }
    serde_json::from_str(&input).context("Invocation event is not valid JSON")
}
