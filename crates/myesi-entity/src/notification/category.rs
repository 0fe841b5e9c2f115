//! Notification category derived from the notification type tag.

use serde::{Deserialize, Serialize};

/// Every security-alert type tag starts with this prefix.
pub const CVE_TYPE_PREFIX: &str = "cve_";

/// Category of a notification for filtering and counting.
///
/// Anything that is not a `cve_*` type lands in [`NotificationCategory::Payment`],
/// including types added later that have nothing to do with billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Security alerts (`cve_critical`, `cve_high`, ...).
    Cve,
    /// Billing and account events (`payment_failed`, `invoice_available`, ...).
    Payment,
}

impl NotificationCategory {
    /// Classify a notification type tag.
    pub fn of(notification_type: &str) -> Self {
        if notification_type.starts_with(CVE_TYPE_PREFIX) {
            Self::Cve
        } else {
            Self::Payment
        }
    }

    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cve => "cve",
            Self::Payment => "payment",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
