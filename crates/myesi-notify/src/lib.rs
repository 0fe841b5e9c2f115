//! # myesi-notify
//!
//! Notification aggregation for the MyESI console.
//!
//! - `store` — the pure record set with derived counts and filtered views
//! - `filter` — category filters and per-category counts
//! - `source` — the remote notification feed contract and its query
//! - `center` — async facade pairing remote mutations with the local store
//! - `poller` — periodic refresh with jitter and shutdown
//! - `badge` — unread badge rendering

pub mod badge;
pub mod center;
pub mod filter;
pub mod poller;
pub mod source;
pub mod store;

pub use badge::badge_label;
pub use center::NotificationCenter;
pub use filter::{CategoryCounts, NotificationFilter};
pub use poller::NotificationPoller;
pub use source::{NotificationPage, NotificationQuery, NotificationSource};
pub use store::NotificationStore;
