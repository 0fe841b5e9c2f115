//! Core traits defined in `myesi-core` and implemented by other crates.

pub mod token_store;

pub use token_store::{StoredSession, TokenStore};
