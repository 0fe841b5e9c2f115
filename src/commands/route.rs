//! Route access checks and role navigation.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use myesi_auth::{RbacEnforcer, RouteAccess, home_path};
use myesi_core::error::AppError;
use myesi_core::result::AppResult;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for route commands
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Route subcommand
    #[command(subcommand)]
    pub command: RouteCommand,
}

/// Route subcommands
#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Evaluate entry to a dashboard path for the current session
    Check {
        /// Location, e.g. /admin/users
        path: String,
    },
    /// List the dashboard routes and who may enter them
    List,
    /// Show the navigation menu for a role (default: current role)
    Menu {
        /// Role name
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Show the permissions granted to a role (default: current role)
    Permissions {
        /// Role name
        #[arg(short, long)]
        role: Option<String>,
    },
}

/// Route display row
#[derive(Debug, Serialize, Tabled)]
struct RouteRow {
    /// Path
    path: String,
    /// Access
    access: String,
    /// Label
    label: String,
}

/// Menu display row
#[derive(Debug, Serialize, Tabled)]
struct MenuRow {
    /// Name
    name: String,
    /// Path
    path: String,
}

/// Execute route commands
pub fn execute(ctx: &Context, args: &RouteArgs, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        RouteCommand::Check { path } => {
            let decision = ctx.gate.evaluate_route(&ctx.session, &ctx.routes, path);
            output::print_decision(path, &decision, format);
        }
        RouteCommand::List => {
            let rows: Vec<RouteRow> = ctx
                .routes
                .entries()
                .iter()
                .map(|entry| RouteRow {
                    path: entry.path.clone(),
                    access: match &entry.access {
                        RouteAccess::Public => "public".to_string(),
                        RouteAccess::Protected(None) => "signed in".to_string(),
                        RouteAccess::Protected(Some(required)) => required.to_string(),
                        RouteAccess::Redirect(to) => format!("→ {to}"),
                    },
                    label: entry.label.clone().unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        RouteCommand::Menu { role } => {
            let role = resolve_role(ctx, role.as_deref())?;
            let rows: Vec<MenuRow> = ctx
                .routes
                .menu_for(&role)
                .into_iter()
                .map(|item| MenuRow {
                    name: item.name,
                    path: item.path,
                })
                .collect();
            if format == OutputFormat::Table {
                output::print_kv("Home", home_path(&role));
            }
            output::print_list(&rows, format);
        }
        RouteCommand::Permissions { role } => {
            let role = resolve_role(ctx, role.as_deref())?;
            let permissions: Vec<&str> = RbacEnforcer::new()
                .permissions_for(&role)
                .into_iter()
                .collect();
            match format {
                OutputFormat::Json => output::print_item(&permissions, format),
                OutputFormat::Table if permissions.is_empty() => {
                    output::print_warning(&format!("Role '{role}' has no permissions"))
                }
                OutputFormat::Table => {
                    for permission in permissions {
                        println!("  {permission}");
                    }
                }
            }
        }
    }

    Ok(())
}

/// The explicit role, or the signed-in identity's role.
fn resolve_role(ctx: &Context, role: Option<&str>) -> AppResult<String> {
    match role {
        Some(role) => Ok(role.to_string()),
        None => ctx.require_identity().map(|identity| identity.role).map_err(|_| {
            AppError::validation("Not signed in; pass --role to choose a role")
        }),
    }
}
