//! MyESI console entry point.
//!
//! Wires configuration, logging, the session manager and the notification
//! center together and dispatches the requested command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use myesi_core::config::AppConfig;
use myesi_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(config).await {
        tracing::debug!(error = %e, kind = %e.kind, "Command failed");
        output::print_error(&e.message);
        std::process::exit(1);
    }
}

/// Load configuration from `--config`, `MYESI_CONFIG` or the default path.
fn load_configuration(path: Option<&str>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(str::to_string)
        .or_else(|| std::env::var("MYESI_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    AppConfig::load(&config_path)
}

/// Initialize tracing/logging. Logs go to stderr so command output stays
/// machine-readable.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
