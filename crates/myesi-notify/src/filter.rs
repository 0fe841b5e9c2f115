//! Category filters over notification records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use myesi_core::error::AppError;
use myesi_entity::notification::{Notification, NotificationCategory};

/// A view over the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFilter {
    /// Every record.
    #[default]
    All,
    /// Records not yet read.
    Unread,
    /// Security alerts (`cve_*` types).
    Cve,
    /// Everything that is not a security alert.
    Payment,
}

impl NotificationFilter {
    /// All filters, in display order.
    pub const ALL: [NotificationFilter; 4] = [Self::All, Self::Unread, Self::Cve, Self::Payment];

    /// Whether `notification` is part of this view.
    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            Self::All => true,
            Self::Unread => notification.is_unread(),
            Self::Cve => notification.category() == NotificationCategory::Cve,
            Self::Payment => notification.category() == NotificationCategory::Payment,
        }
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unread => "unread",
            Self::Cve => "cve",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for NotificationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "unread" => Ok(Self::Unread),
            "cve" => Ok(Self::Cve),
            "payment" => Ok(Self::Payment),
            _ => Err(AppError::validation(format!(
                "Invalid filter: '{s}'. Expected one of: all, unread, cve, payment"
            ))),
        }
    }
}

/// Record counts per filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// Every record.
    pub all: usize,
    /// Unread records.
    pub unread: usize,
    /// Security alerts.
    pub cve: usize,
    /// Billing/account events.
    pub payment: usize,
}

impl CategoryCounts {
    /// Count `records` in a single pass.
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a Notification>) -> Self {
        records.into_iter().fold(Self::default(), |mut counts, n| {
            counts.all += 1;
            if n.is_unread() {
                counts.unread += 1;
            }
            match n.category() {
                NotificationCategory::Cve => counts.cve += 1,
                NotificationCategory::Payment => counts.payment += 1,
            }
            counts
        })
    }

    /// The count for `filter`.
    pub fn get(&self, filter: NotificationFilter) -> usize {
        match filter {
            NotificationFilter::All => self.all,
            NotificationFilter::Unread => self.unread,
            NotificationFilter::Cve => self.cve,
            NotificationFilter::Payment => self.payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!("CVE".parse::<NotificationFilter>().unwrap(), NotificationFilter::Cve);
        assert!("billing".parse::<NotificationFilter>().is_err());
    }
}
