//! Configuration inspection commands.

use clap::{Args, Subcommand};

use myesi_core::config::AppConfig;
use myesi_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check the configuration and summarize which backend and session file are in use
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            if shown.auth.token_secret.is_some() {
                shown.auth.token_secret = Some("********".to_string());
            }
            match format {
                OutputFormat::Json => output::print_item(&shown, format),
                OutputFormat::Table => {
                    for (section, value) in [
                        ("api", serde_json::to_value(&shown.api)),
                        ("auth", serde_json::to_value(&shown.auth)),
                        ("session", serde_json::to_value(&shown.session)),
                        ("notifications", serde_json::to_value(&shown.notifications)),
                        ("mock", serde_json::to_value(&shown.mock)),
                        ("logging", serde_json::to_value(&shown.logging)),
                    ] {
                        println!("[{section}]");
                        output::print_item(&value?, format);
                    }
                }
            }
        }
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success("Configuration is valid");
            let backend = if config.api.should_use_mock() {
                "simulated".to_string()
            } else {
                config.api.base_url.clone()
            };
            output::print_kv("Backend", &backend);
            output::print_kv("Session file", &config.session.token_file);
            output::print_kv(
                "Token signatures",
                if config.auth.token_secret.is_some() {
                    "verified"
                } else {
                    "not verified"
                },
            );
            output::print_kv(
                "Poll interval",
                &format!("{}s", config.notifications.poll_interval_seconds),
            );
        }
    }

    Ok(())
}
