//! Persisted session slot backends.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use myesi_core::config::SessionConfig;
use myesi_core::error::AppError;
use myesi_core::result::AppResult;
use myesi_core::traits::{StoredSession, TokenStore};

/// Slot held in process memory; gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with `session`.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> AppResult<Option<StoredSession>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &StoredSession) -> AppResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Slot stored as a JSON document on disk, shared by every process that
/// points at the same file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the slot at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the slot at the configured `session.token_file`.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.token_file)
    }

    /// Location of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> AppResult<Option<StoredSession>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file unreadable; treating as absent");
                return Ok(None);
            }
        };

        match serde_json::from_slice::<StoredSession>(&bytes) {
            Ok(session) if !session.access_token.trim().is_empty() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file malformed; treating as absent");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &StoredSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::with_source(
                    myesi_core::ErrorKind::Storage,
                    format!("Failed to create session directory {}", parent.display()),
                    e,
                )
            })?;
        }

        // write-then-rename keeps readers from seeing a half-written slot
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Session slot written");
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&StoredSession::token_only("t1")).unwrap();
        store.save(&StoredSession::token_only("t2")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().access_token, "t2");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/session.json"));

        assert!(store.load().unwrap().is_none());
        let session = StoredSession {
            access_token: "a.b.c".to_string(),
            user: Some(serde_json::json!({ "email": "admin@myesi.com" })),
        };
        store.save(&session).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["accessToken"], "a.b.c");

        assert_eq!(FileTokenStore::new(store.path()).load().unwrap(), Some(session));

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_malformed_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(FileTokenStore::new(&path).load().unwrap().is_none());

        std::fs::write(&path, br#"{"accessToken":""}"#).unwrap();
        assert!(FileTokenStore::new(&path).load().unwrap().is_none());
    }
}
