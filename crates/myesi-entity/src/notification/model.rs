//! Notification entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::category::NotificationCategory;
use super::severity::Severity;

/// Identifier of a notification record.
///
/// The backend emits numeric ids for fixtures and string ids elsewhere, so
/// both are accepted and held as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for NotificationId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NotificationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// A security-alert or billing event shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Type tag: `cve_*` for security alerts, anything else for billing/account events.
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Display severity.
    #[serde(default)]
    pub severity: Severity,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Whether the user has read this notification.
    #[serde(default)]
    pub read: bool,
    /// Navigation target associated with the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    /// CVSS base score, only present on `cve_*` types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f64>,
    /// Type-specific fields (`cveId`, `amount`, `planName`, `invoiceId`, ...).
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// The category this notification belongs to.
    pub fn category(&self) -> NotificationCategory {
        NotificationCategory::of(&self.notification_type)
    }

    /// Whether this is a security alert.
    pub fn is_cve(&self) -> bool {
        self.category() == NotificationCategory::Cve
    }

    /// A type-specific string field, e.g. `cveId`.
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let raw = serde_json::json!({
            "id": 1,
            "type": "cve_critical",
            "severity": "critical",
            "title": "Critical CVE Detected",
            "message": "CVE-2024-1234: Remote Code Execution vulnerability found in OpenSSL 3.0.1",
            "cveId": "CVE-2024-1234",
            "cvssScore": 9.8,
            "affectedComponent": "OpenSSL 3.0.1",
            "timestamp": "2025-11-20T10:00:00Z",
            "read": false,
            "actionUrl": "/admin/dashboard#vulnerabilities"
        });

        let n: Notification = serde_json::from_value(raw).unwrap();
        assert_eq!(n.id, NotificationId::from(1));
        assert_eq!(n.severity, Severity::Critical);
        assert_eq!(n.cvss_score, Some(9.8));
        assert!(n.is_cve());
        assert!(n.is_unread());
        assert_eq!(n.detail_str("cveId"), Some("CVE-2024-1234"));
        assert_eq!(n.action_url.as_deref(), Some("/admin/dashboard#vulnerabilities"));
    }

    #[test]
    fn test_string_id_and_missing_optionals() {
        let raw = serde_json::json!({
            "id": "evt-7",
            "type": "invoice_available",
            "title": "New Invoice Available",
            "message": "Your invoice is ready.",
            "timestamp": "2025-11-20T10:00:00Z"
        });

        let n: Notification = serde_json::from_value(raw).unwrap();
        assert_eq!(n.id.as_str(), "evt-7");
        assert!(!n.read);
        assert_eq!(n.severity, Severity::Info);
        assert_eq!(n.category(), NotificationCategory::Payment);
        assert!(n.cvss_score.is_none());
    }
}
