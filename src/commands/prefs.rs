//! Notification preference commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use myesi_core::error::AppError;
use myesi_core::result::AppResult;
use myesi_entity::notification::NotificationPreferences;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for preference commands
#[derive(Debug, Args)]
pub struct PrefsArgs {
    /// Preference subcommand
    #[command(subcommand)]
    pub command: PrefsCommand,
}

/// Preference subcommands
#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Show current preferences
    Get,
    /// Change preferences; keys not given keep their values
    Set {
        /// One or more key=true|false pairs, e.g. criticalCVEs=false
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, bool)>,
    },
}

/// Preference display row
#[derive(Debug, Serialize, Tabled)]
struct PreferenceRow {
    /// Key
    key: String,
    /// Enabled
    enabled: bool,
}

/// Execute preference commands
pub async fn execute(ctx: &Context, args: &PrefsArgs, format: OutputFormat) -> AppResult<()> {
    ctx.require_identity()?;
    let center = ctx.notification_center();

    let prefs = match &args.command {
        PrefsCommand::Get => center.preferences().await,
        PrefsCommand::Set { pairs } => {
            let patch: NotificationPreferences = pairs.iter().cloned().collect();
            center.update_preferences(&patch).await
        }
    }
    .map_err(|e| ctx.handle_rejection(e, "/admin/notifications"))?;

    match format {
        OutputFormat::Json => output::print_item(&prefs, format),
        OutputFormat::Table => {
            let rows: Vec<PreferenceRow> = prefs
                .iter()
                .map(|(key, enabled)| PreferenceRow {
                    key: key.to_string(),
                    enabled,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

/// Parses `key=true|false`.
fn parse_pair(raw: &str) -> Result<(String, bool), AppError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::validation(format!("Expected key=true|false, got '{raw}'")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::validation("Preference key must not be empty"));
    }
    let enabled = match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => true,
        "false" | "off" | "0" => false,
        other => {
            return Err(AppError::validation(format!(
                "Invalid value '{other}' for '{key}'; use true or false"
            )));
        }
    };
    Ok((key.to_string(), enabled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("criticalCVEs=false").unwrap(),
            ("criticalCVEs".to_string(), false)
        );
        assert_eq!(parse_pair(" highCVEs = ON ").unwrap(), ("highCVEs".to_string(), true));
        assert!(parse_pair("criticalCVEs").is_err());
        assert!(parse_pair("=true").is_err());
        assert!(parse_pair("highCVEs=maybe").is_err());
    }
}
