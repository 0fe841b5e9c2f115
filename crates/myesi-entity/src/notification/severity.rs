//! Notification severity levels.

use serde::{Deserialize, Serialize};

/// Advisory severity of a notification, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Exploitable vulnerability or failed payment.
    Critical,
    /// High severity vulnerability.
    High,
    /// Medium severity vulnerability.
    Medium,
    /// Low severity vulnerability.
    Low,
    /// Informational event.
    #[default]
    Info,
    /// Something needs attention soon (e.g. expiring subscription).
    Warning,
}

impl Severity {
    /// Parse from string, falling back to `Info` for unknown values.
    pub fn from_str_value(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }

    /// Whether the notification should be highlighted.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
