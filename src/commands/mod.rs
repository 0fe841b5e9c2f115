//! CLI command definitions and dispatch.

pub mod config;
pub mod notifications;
pub mod prefs;
pub mod route;
pub mod session;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use myesi_auth::{FileTokenStore, RouteGate, RouteTable, SessionManager};
use myesi_client::{ClientProvider, rejection_status};
use myesi_core::config::AppConfig;
use myesi_core::error::AppError;
use myesi_core::result::AppResult;
use myesi_core::traits::token_store::TokenStore;
use myesi_entity::user::Identity;
use myesi_notify::NotificationCenter;

use crate::output::{self, OutputFormat};

/// MyESI console: session, route access and notifications
#[derive(Debug, Parser)]
#[command(name = "myesi", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to $MYESI_CONFIG, then config/default.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login(session::LoginArgs),
    /// End the current session
    Logout,
    /// Show the current session
    Status,
    /// Fetch the current profile from the backend
    Profile,
    /// Route access checks and navigation
    Route(route::RouteArgs),
    /// Notification center
    Notifications(notifications::NotificationArgs),
    /// Notification preferences
    Prefs(prefs::PrefsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &config, self.format);
        }

        let ctx = Context::build(config)?;
        let result = match &self.command {
            Commands::Login(args) => session::login(&ctx, args, self.format).await,
            Commands::Logout => session::logout(&ctx).await,
            Commands::Status => session::status(&ctx, self.format),
            Commands::Profile => session::profile(&ctx, self.format).await,
            Commands::Route(args) => route::execute(&ctx, args, self.format),
            Commands::Notifications(args) => notifications::execute(&ctx, args, self.format).await,
            Commands::Prefs(args) => prefs::execute(&ctx, args, self.format).await,
            Commands::Config(_) => Ok(()),
        };
        ctx.session.dispose();
        result
    }
}

/// Everything a command needs, built once per invocation.
pub struct Context {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Session restored from the persisted slot.
    pub session: Arc<SessionManager>,
    /// Backend collaborators.
    pub provider: ClientProvider,
    /// Route gate.
    pub gate: RouteGate,
    /// Dashboard route table.
    pub routes: RouteTable,
}

impl Context {
    /// Build collaborators and restore the session.
    pub fn build(config: AppConfig) -> AppResult<Self> {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::from_config(&config.session));
        let provider = ClientProvider::from_config(&config, Arc::clone(&store))?;
        let session = Arc::new(SessionManager::from_config(
            &config,
            store,
            provider.gateway(),
        ));

        let status = session.initialize();
        debug!(status = ?status, mock = provider.is_mock(), "Session restored");

        Ok(Self {
            gate: RouteGate::new(&config.auth),
            routes: RouteTable::myesi(&config.auth.login_path, &config.auth.forbidden_path),
            config,
            session,
            provider,
        })
    }

    /// The signed-in identity, or an error asking the user to log in.
    pub fn require_identity(&self) -> AppResult<Identity> {
        if !self.session.is_authenticated() {
            return Err(AppError::unauthenticated(
                "Not signed in. Run `myesi login` first.",
            ));
        }
        self.session
            .identity()
            .ok_or_else(|| AppError::unauthenticated("Not signed in. Run `myesi login` first."))
    }

    /// A notification center over the configured feed.
    pub fn notification_center(&self) -> Arc<NotificationCenter> {
        Arc::new(NotificationCenter::new(
            self.provider.notifications(),
            &self.config.notifications,
        ))
    }

    /// Reacts to a backend rejection the way the dashboard did: 401 ends
    /// the session, 403 points at the forbidden page.
    pub fn handle_rejection(&self, err: AppError, location: &str) -> AppError {
        if let Some(status) = rejection_status(&err) {
            if let Some(decision) = self.session.handle_remote_rejection(status, location) {
                output::print_decision(location, &decision, OutputFormat::Table);
            }
        }
        err
    }
}
