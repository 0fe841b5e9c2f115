//! REST backend collaborators.

pub mod auth;
pub mod client;
pub mod notifications;

pub use auth::HttpAuthGateway;
pub use client::{ApiClient, rejection_status};
pub use notifications::HttpNotificationSource;
