//! User domain entities.

pub mod credentials;
pub mod identity;
pub mod requirement;
pub mod role;

pub use credentials::Credentials;
pub use identity::Identity;
pub use requirement::RequiredRole;
pub use role::{Role, normalize_role};
