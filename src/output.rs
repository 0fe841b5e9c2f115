//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use myesi_auth::GateDecision;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(items, "[]"),
    }
}

/// Print a single item as key/value lines or JSON
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => match serde_json::to_value(item) {
            Ok(serde_json::Value::Object(map)) => {
                for (key, value) in map {
                    print_kv(&key, &display_value(&value));
                }
            }
            Ok(other) => println!("{}", display_value(&other)),
            Err(_) => println!("{{}}"),
        },
        OutputFormat::Json => print_json(item, "{}"),
    }
}

/// Print where a gate decision sends the user
pub fn print_decision(path: &str, decision: &GateDecision, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(decision, "{}"),
        OutputFormat::Table => match decision {
            GateDecision::Allow => print_success(&format!("{path}: allowed")),
            GateDecision::Checking => print_warning(&format!("{path}: session not resolved")),
            GateDecision::RedirectLogin { to, from } => {
                print_warning(&format!("{path}: login required, redirect to {to} (from {from})"))
            }
            GateDecision::RedirectForbidden { to } => {
                print_warning(&format!("{path}: forbidden, redirect to {to}"))
            }
            GateDecision::Redirect { to } => println!("→ {path}: redirects to {to}"),
        },
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

fn print_json<T: Serialize + ?Sized>(value: &T, empty: &str) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| empty.to_string());
    println!("{json}");
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
