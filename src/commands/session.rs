//! Sign-in, sign-out and session inspection commands.

use clap::Args;
use serde::Serialize;

use myesi_auth::home_path;
use myesi_core::error::AppError;
use myesi_core::result::AppResult;
use myesi_entity::user::{Credentials, Identity};

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(short, long)]
    pub email: Option<String>,

    /// Password (prompted without echo when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Session summary shown by `status` and after `login`
#[derive(Debug, Serialize)]
struct SessionView {
    status: String,
    user_id: Option<String>,
    email: Option<String>,
    name: Option<String>,
    role: Option<String>,
    home: Option<&'static str>,
    expires_at: Option<String>,
    backend: &'static str,
}

impl SessionView {
    fn build(ctx: &Context, identity: Option<&Identity>) -> Self {
        let status = if ctx.session.is_authenticated() {
            "authenticated".to_string()
        } else {
            serde_json::to_value(ctx.session.status())
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "anonymous".to_string())
        };
        let expires_at = ctx
            .session
            .claims()
            .and_then(|c| c.expires_at())
            .map(|t| t.to_rfc3339());

        Self {
            status,
            user_id: identity.map(|i| i.id.clone()),
            email: identity.map(|i| i.email.clone()),
            name: identity.map(|i| i.name.clone()),
            role: identity.map(|i| i.role.clone()),
            home: identity.map(|i| home_path(&i.role)),
            expires_at,
            backend: if ctx.provider.is_mock() { "mock" } else { "http" },
        }
    }
}

/// `myesi login`
pub async fn login(ctx: &Context, args: &LoginArgs, format: OutputFormat) -> AppResult<()> {
    let email = match &args.email {
        Some(email) => email.clone(),
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    let identity = ctx
        .session
        .login(&Credentials::new(email, password))
        .await
        .map_err(|e| AppError::new(e.kind, e.user_message()))?;

    output::print_success(&format!("Signed in as {} ({})", identity.name, identity.role));
    output::print_item(&SessionView::build(ctx, Some(&identity)), format);
    Ok(())
}

/// `myesi logout`
pub async fn logout(ctx: &Context) -> AppResult<()> {
    let was_signed_in = ctx.session.is_authenticated();
    ctx.session.logout().await;
    if was_signed_in {
        output::print_success("Signed out");
    } else {
        output::print_warning("No active session; local state cleared");
    }
    Ok(())
}

/// `myesi status`
pub fn status(ctx: &Context, format: OutputFormat) -> AppResult<()> {
    let identity = ctx
        .session
        .is_authenticated()
        .then(|| ctx.session.identity())
        .flatten();
    output::print_item(&SessionView::build(ctx, identity.as_ref()), format);
    Ok(())
}

/// `myesi profile`
pub async fn profile(ctx: &Context, format: OutputFormat) -> AppResult<()> {
    ctx.require_identity()?;
    let identity = ctx
        .session
        .fetch_profile()
        .await
        .map_err(|e| ctx.handle_rejection(e, "/"))?;
    output::print_item(&identity, format);
    Ok(())
}
