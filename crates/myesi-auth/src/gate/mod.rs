//! Route/capability gate, the console route table and role navigation.

pub mod guard;
pub mod navigation;
pub mod routes;

pub use guard::{GateDecision, RouteGate};
pub use navigation::{MenuItem, home_path, role_from_path};
pub use routes::{RouteAccess, RouteEntry, RouteTable};
