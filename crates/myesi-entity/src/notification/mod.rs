//! Notification domain entities.

pub mod category;
pub mod model;
pub mod preference;
pub mod severity;

pub use category::{CVE_TYPE_PREFIX, NotificationCategory};
pub use model::{Notification, NotificationId};
pub use preference::NotificationPreferences;
pub use severity::Severity;
