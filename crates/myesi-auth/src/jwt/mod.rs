//! Session token decoding, issuing, and claims.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::TokenDecoder;
pub use encoder::{IssuedToken, TokenEncoder};

/// Prefix of the legacy unsigned token format: `mock_<base64(JSON claims)>`.
pub const LEGACY_TOKEN_PREFIX: &str = "mock_";
