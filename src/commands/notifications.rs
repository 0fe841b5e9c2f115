//! Notification center commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::watch;

use myesi_core::error::AppError;
use myesi_core::result::AppResult;
use myesi_entity::notification::{Notification, NotificationId};
use myesi_notify::{NotificationCenter, NotificationFilter, NotificationPoller};

use super::Context;
use crate::output::{self, OutputFormat};

/// Location reported to the session when the feed rejects a call.
const NOTIFICATIONS_PATH: &str = "/admin/notifications";

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List notifications, newest first
    List {
        /// View: all, unread, cve or payment
        #[arg(long, default_value = "all")]
        filter: NotificationFilter,
    },
    /// Show one notification
    Show {
        /// Notification ID
        id: String,
    },
    /// Mark a notification read
    Read {
        /// Notification ID
        id: String,
    },
    /// Mark every notification read
    ReadAll,
    /// Delete a notification
    Delete {
        /// Notification ID
        id: String,
    },
    /// Show per-view counts and the unread badge
    Counts,
    /// Poll the feed until interrupted, printing the unread badge
    Watch,
}

/// Notification display row
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// ID
    id: String,
    /// Read marker
    #[tabled(rename = " ")]
    unread: &'static str,
    /// Severity
    severity: String,
    /// Type
    #[tabled(rename = "type")]
    kind: String,
    /// Title
    title: String,
    /// When
    when: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            unread: if n.is_unread() { "●" } else { "" },
            severity: n.severity.as_str().to_string(),
            kind: n.notification_type.clone(),
            title: n.title.clone(),
            when: n.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Count display row
#[derive(Debug, Serialize, Tabled)]
struct CountRow {
    /// View
    view: &'static str,
    /// Count
    count: usize,
}

/// Execute notification commands
pub async fn execute(ctx: &Context, args: &NotificationArgs, format: OutputFormat) -> AppResult<()> {
    ctx.require_identity()?;
    let center = ctx.notification_center();

    if let NotificationCommand::Watch = args.command {
        return watch_feed(ctx, center).await;
    }

    center
        .refresh()
        .await
        .map_err(|e| ctx.handle_rejection(e, NOTIFICATIONS_PATH))?;

    match &args.command {
        NotificationCommand::List { filter } => {
            let rows: Vec<NotificationRow> =
                center.list(*filter).iter().map(NotificationRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_kv("Unread", &center.badge());
            }
        }
        NotificationCommand::Show { id } => {
            let id = NotificationId::from(id.as_str());
            let notification = center
                .get(&id)
                .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
            output::print_item(&notification, format);
        }
        NotificationCommand::Read { id } => {
            let id = NotificationId::from(id.as_str());
            let changed = center
                .mark_read(&id)
                .await
                .map_err(|e| ctx.handle_rejection(e, NOTIFICATIONS_PATH))?;
            if changed {
                output::print_success(&format!("Notification {id} marked read"));
            } else {
                output::print_warning(&format!("Notification {id} not found or already read"));
            }
        }
        NotificationCommand::ReadAll => {
            let changed = center
                .mark_all_read()
                .await
                .map_err(|e| ctx.handle_rejection(e, NOTIFICATIONS_PATH))?;
            output::print_success(&format!("Marked {changed} notifications read"));
        }
        NotificationCommand::Delete { id } => {
            let id = NotificationId::from(id.as_str());
            let removed = center
                .remove(&id)
                .await
                .map_err(|e| ctx.handle_rejection(e, NOTIFICATIONS_PATH))?;
            match removed {
                Some(n) => output::print_success(&format!("Deleted notification {id}: {}", n.title)),
                None => output::print_warning(&format!("Notification {id} not found")),
            }
        }
        NotificationCommand::Counts => {
            let counts = center.counts();
            let rows: Vec<CountRow> = NotificationFilter::ALL
                .into_iter()
                .map(|filter| CountRow {
                    view: filter.as_str(),
                    count: counts.get(filter),
                })
                .collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_kv("Badge", &center.badge());
            }
        }
        NotificationCommand::Watch => {}
    }

    Ok(())
}

/// Runs the poller until Ctrl-C or until the session expires.
async fn watch_feed(ctx: &Context, center: Arc<NotificationCenter>) -> AppResult<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle =
        NotificationPoller::new(Arc::clone(&center), &ctx.config.notifications).spawn(shutdown_rx);

    output::print_success("Watching notifications (Ctrl-C to stop)");
    let mut display = tokio::time::interval(ctx.config.notifications.poll_interval());
    let mut last_badge = None;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Ok(()),
            _ = display.tick() => {
                if !ctx.session.is_authenticated() {
                    break Err(AppError::token_expired("Session expired; sign in again"));
                }
                let badge = center.badge();
                if last_badge.as_ref() != Some(&badge) {
                    let shown = if badge.is_empty() { "0" } else { badge.as_str() };
                    output::print_kv("Unread", shown);
                    last_badge = Some(badge);
                }
            }
        }
    };

    let _ = shutdown_tx.send(true);
    if let Err(e) = handle.await {
        tracing::warn!(error = %e, "Notification poller task failed");
    }
    outcome
}
