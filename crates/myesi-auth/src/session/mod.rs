//! Session lifecycle: the authentication endpoint contract, the persisted
//! token slot and the manager that owns the current identity.

pub mod gateway;
pub mod manager;
pub mod state;
pub mod store;

pub use gateway::{AuthGateway, LoginResponse, UserPayload};
pub use manager::SessionManager;
pub use state::SessionStatus;
pub use store::{FileTokenStore, MemoryTokenStore};
