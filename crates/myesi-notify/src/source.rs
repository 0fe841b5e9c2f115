//! Remote notification feed contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use myesi_core::result::AppResult;
use myesi_entity::notification::{
    Notification, NotificationId, NotificationPreferences, Severity,
};

/// Server-side selection applied by [`NotificationSource::fetch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationQuery {
    /// Only unread records.
    #[serde(default)]
    pub unread_only: bool,
    /// Only records whose type starts with this prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_prefix: Option<String>,
    /// Only records of exactly this severity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl NotificationQuery {
    /// Whether `notification` is selected.
    pub fn matches(&self, notification: &Notification) -> bool {
        if self.unread_only && notification.read {
            return false;
        }
        if let Some(prefix) = &self.type_prefix {
            if !notification.notification_type.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if notification.severity != severity {
                return false;
            }
        }
        true
    }

    /// Builds the page a feed returns for this query over `records`: the
    /// selected records and their total, plus the unread count of the whole
    /// set.
    pub fn page(&self, records: &[Notification]) -> NotificationPage {
        let notifications: Vec<Notification> =
            records.iter().filter(|n| self.matches(n)).cloned().collect();
        NotificationPage {
            total: notifications.len(),
            unread_count: records.iter().filter(|n| n.is_unread()).count(),
            notifications,
        }
    }

    /// Query-string pairs for an HTTP request.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.unread_only {
            params.push(("unreadOnly", "true".to_string()));
        }
        if let Some(prefix) = &self.type_prefix {
            params.push(("type", prefix.clone()));
        }
        if let Some(severity) = self.severity {
            params.push(("severity", severity.as_str().to_string()));
        }
        params
    }
}

/// One fetch result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    /// Selected records.
    pub notifications: Vec<Notification>,
    /// Number of selected records.
    #[serde(default)]
    pub total: usize,
    /// Server-computed unread count over the whole set; a hint only.
    #[serde(default)]
    pub unread_count: usize,
}

/// Remote feed of notification records and preferences.
///
/// Mutations report failure as an error; the caller keeps its local state
/// unchanged in that case.
#[async_trait]
pub trait NotificationSource: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch records selected by `query`.
    async fn fetch(&self, query: &NotificationQuery) -> AppResult<NotificationPage>;

    /// Mark one record read.
    async fn mark_read(&self, id: &NotificationId) -> AppResult<()>;

    /// Mark every record read.
    async fn mark_all_read(&self) -> AppResult<()>;

    /// Delete one record.
    async fn delete(&self, id: &NotificationId) -> AppResult<()>;

    /// Current preferences.
    async fn preferences(&self) -> AppResult<NotificationPreferences>;

    /// Apply `patch` to the preferences.
    async fn update_preferences(&self, patch: &NotificationPreferences) -> AppResult<()>;

    /// A record that arrived since the last call, for feeds that push
    /// events between fetches.
    async fn poll_arrival(&self) -> AppResult<Option<Notification>> {
        Ok(None)
    }
}
