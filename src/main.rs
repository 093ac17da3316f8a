//! Log traffic harness.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client / harness-cli
//!         │
//!         ▼
//!  ┌──────────────┐    ┌──────────────────────┐    ┌──────────────┐
//!  │ http server  │───▶│ harness handlers     │───▶│ tracing      │──▶ stdout
//!  │ (middleware) │    │ counter, rng, logs   │    │ subscriber   │    (pretty/JSON)
//!  └──────────────┘    └──────────────────────┘    └──────────────┘
//!         │                      │
//!         ▼                      ▼
//!     lifecycle            metrics exporter (optional)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use log_harness::config::{load_config, HarnessConfig, LogFormat};
use log_harness::lifecycle::startup;
use log_harness::observability::logging;

#[derive(Parser)]
#[command(name = "log-harness")]
#[command(about = "HTTP service that emits synthetic log traffic for pipeline testing", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the log level filter.
    #[arg(long)]
    log_level: Option<String>,

    /// Override the log output format.
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    match value {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => HarnessConfig::default(),
    };

    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.observability.log_format = format;
    }

    if let Err(errors) = log_harness::config::validate_config(&config) {
        for e in errors {
            eprintln!("Invalid configuration: {e}");
        }
        return ExitCode::FAILURE;
    }

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!("log-harness v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Harness failed");
            ExitCode::FAILURE
        }
    }
}
