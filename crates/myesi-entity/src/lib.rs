//! # myesi-entity
//!
//! Domain value objects for the MyESI console: the authenticated identity
//! and its role, login credentials, notification records and notification
//! preferences. All entities derive `Debug`, `Clone`, `Serialize` and
//! `Deserialize` and use the backend's camelCase field names on the wire.

pub mod notification;
pub mod user;
