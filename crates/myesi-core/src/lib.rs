//! # myesi-core
//!
//! Core crate for the MyESI console. Contains the configuration schema,
//! the persisted token slot trait and the unified error system.
//!
//! This crate has **no** internal dependencies on other MyESI crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
