//! # myesi-auth
//!
//! Client-side authentication and authorization for the MyESI console.
//!
//! ## Modules
//!
//! - `jwt` — session token claims, decoding (verified or unverified) and issuing
//! - `password` — Argon2id password hashing for the simulated backend
//! - `session` — the session manager, its persisted token slot and the authentication endpoint trait
//! - `gate` — route/capability gate, route table and role navigation
//! - `rbac` — role-to-permission policies

pub mod gate;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use gate::{GateDecision, MenuItem, RouteAccess, RouteGate, RouteTable, home_path};
pub use jwt::{Claims, TokenDecoder, TokenEncoder};
pub use password::PasswordHasher;
pub use rbac::{Permission, RbacEnforcer, RbacPolicies};
pub use session::{
    AuthGateway, FileTokenStore, LoginResponse, MemoryTokenStore, SessionManager, SessionStatus,
    UserPayload,
};
