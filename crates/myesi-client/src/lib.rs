//! # myesi-client
//!
//! Backend collaborators for the MyESI console. Supports two modes:
//!
//! - **http**: the REST backend, reached with [reqwest](https://crates.io/crates/reqwest)
//! - **mock**: an in-process simulated backend with demo accounts, fixture
//!   notifications and artificial latency
//!
//! The mode is selected at runtime from the API configuration.

pub mod http;
pub mod mock;
pub mod provider;

pub use http::{HttpAuthGateway, HttpNotificationSource, rejection_status};
pub use mock::{MockAuthGateway, MockNotificationSource};
pub use provider::ClientProvider;
