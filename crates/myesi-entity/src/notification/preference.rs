//! Notification preference entity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-user switches for notification delivery.
///
/// A flat map from preference key to enabled flag. Keys have no
/// cross-key invariants; updates are a shallow merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationPreferences(BTreeMap<String, bool>);

impl NotificationPreferences {
    /// Email delivery of notifications.
    pub const EMAIL_NOTIFICATIONS: &'static str = "emailNotifications";
    /// Alerts for critical CVEs.
    pub const CRITICAL_CVES: &'static str = "criticalCVEs";
    /// Alerts for high severity CVEs.
    pub const HIGH_CVES: &'static str = "highCVEs";
    /// Alerts for medium severity CVEs.
    pub const MEDIUM_CVES: &'static str = "mediumCVEs";
    /// Alerts for failed payments.
    pub const PAYMENT_FAILURES: &'static str = "paymentFailures";
    /// Alerts for expiring subscriptions.
    pub const SUBSCRIPTION_EXPIRY: &'static str = "subscriptionExpiry";
    /// Alerts for new invoices.
    pub const INVOICE_AVAILABLE: &'static str = "invoiceAvailable";

    /// An empty preference map.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Whether `key` is enabled. Unknown keys are disabled.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// The flag for `key`, if present.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    /// Set a single flag.
    pub fn set(&mut self, key: impl Into<String>, enabled: bool) {
        self.0.insert(key.into(), enabled);
    }

    /// Shallow-merge `patch` into these preferences.
    ///
    /// Keys present in the patch overwrite; keys absent from it are kept.
    pub fn merge(&mut self, patch: &NotificationPreferences) {
        for (key, enabled) in &patch.0 {
            self.0.insert(key.clone(), *enabled);
        }
    }

    /// Iterate over `(key, enabled)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        let mut prefs = BTreeMap::new();
        prefs.insert(Self::EMAIL_NOTIFICATIONS.to_string(), true);
        prefs.insert(Self::CRITICAL_CVES.to_string(), true);
        prefs.insert(Self::HIGH_CVES.to_string(), true);
        prefs.insert(Self::MEDIUM_CVES.to_string(), false);
        prefs.insert(Self::PAYMENT_FAILURES.to_string(), true);
        prefs.insert(Self::SUBSCRIPTION_EXPIRY.to_string(), true);
        prefs.insert(Self::INVOICE_AVAILABLE.to_string(), false);
        Self(prefs)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for NotificationPreferences {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
