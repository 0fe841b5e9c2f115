//! Session persistence configuration.

use serde::{Deserialize, Serialize};

/// Where the single "current access token" slot lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the JSON file holding the persisted token and user snapshot.
    #[serde(default = "default_token_file")]
    pub token_file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

fn default_token_file() -> String {
    "data/session.json".to_string()
}
