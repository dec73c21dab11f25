// ── Session persistence ──
//
// The session token is the signed-in user's id, kept under one fixed key
// in a `SessionStore`. It has no expiry; it is cleared on logout or when a
// load with it fails.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::UserId;

/// Failure reading or writing the persisted token.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file error: {0}")]
    Io(#[from] io::Error),

    #[error("session backend error: {0}")]
    Backend(String),
}

/// Opaque credential standing in for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The user this token identifies.
    pub fn user_id(&self) -> UserId {
        UserId::new(self.0.clone())
    }
}

impl From<&UserId> for SessionToken {
    fn from(id: &UserId) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Storage backends ─────────────────────────────────────────────────

/// Where the token lives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionToken>, SessionError>;
    fn save(&self, token: &SessionToken) -> Result<(), SessionError>;
    /// Remove the token. Clearing an absent token is not an error.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Token stored as the sole contents of a file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionToken>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let raw = raw.trim();
                Ok((!raw.is_empty()).then(|| SessionToken::new(raw)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &SessionToken) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.as_str())?;
        debug!(path = %self.path.display(), "session token written");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local token, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<SessionToken>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(SessionToken::new(token))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionToken>, SessionError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &SessionToken) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ── Guard ────────────────────────────────────────────────────────────

/// Gatekeeper for authenticated operations.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
}

impl SessionGuard {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Guard backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// The stored token, if any.
    pub fn token(&self) -> Result<Option<SessionToken>, CoreError> {
        Ok(self.store.load()?)
    }

    pub fn is_signed_in(&self) -> Result<bool, CoreError> {
        Ok(self.token()?.is_some())
    }

    /// The token, or [`CoreError::NotAuthenticated`] when absent.
    pub fn require(&self) -> Result<SessionToken, CoreError> {
        self.token()?.ok_or(CoreError::NotAuthenticated)
    }

    pub fn sign_in(&self, token: &SessionToken) -> Result<(), CoreError> {
        self.store.save(token)?;
        info!(user = %token, "signed in");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), CoreError> {
        self.store.clear()?;
        info!("signed out");
        Ok(())
    }

    /// Clear a token that failed to load. Storage errors are logged, not
    /// returned, so the caller can still report the underlying failure.
    pub fn revoke(&self, reason: &str) {
        warn!(reason, "revoking session");
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear revoked session");
        }
    }
}

impl fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn require_without_token_is_not_authenticated() {
        let guard = SessionGuard::in_memory();
        assert!(matches!(guard.require(), Err(CoreError::NotAuthenticated)));
    }

    #[test]
    fn sign_in_then_out() {
        let guard = SessionGuard::in_memory();
        guard.sign_in(&SessionToken::new("7")).unwrap();
        assert_eq!(guard.require().unwrap().as_str(), "7");
        guard.sign_out().unwrap();
        assert!(!guard.is_signed_in().unwrap());
    }

    #[test]
    fn revoke_clears_token() {
        let guard = SessionGuard::new(MemorySessionStore::with_token("7"));
        guard.revoke("load failed");
        assert!(guard.token().unwrap().is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session"));

        assert!(store.load().unwrap().is_none());
        store.save(&SessionToken::new("42")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().as_str(), "42");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn file_store_ignores_blank_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        fs::write(&path, "  \n").unwrap();
        assert!(FileSessionStore::new(path).load().unwrap().is_none());
    }
}
