//! Bearer token session shared between the UI and the API client.
//!
//! The session is the only state the dashboard keeps between runs. It lives
//! in memory behind an `Arc` so request tasks and the UI see the same token,
//! and is mirrored to a single `session.json` file when a store is attached.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

const SESSION_FILE: &str = "session.json";

/// On-disk shape of the session file.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// File holding the persisted bearer token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store the token as `session.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted token. A missing or unreadable file means no token.
    pub fn load(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredSession>(&content) {
            Ok(stored) if !stored.token.is_empty() => Some(stored.token),
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring corrupt session file {:?}: {}", self.path, e);
                None
            }
        }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&StoredSession {
            token: token.to_string(),
        })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Shared login state, injected into the API client at construction.
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Option<TokenStore>,
}

impl Session {
    /// Session that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            store: None,
        }
    }

    /// Session backed by a token file, restoring any token already stored.
    pub fn persistent(store: TokenStore) -> Self {
        let restored = store.load();
        if restored.is_some() {
            info!("Restored session from {:?}", store.path());
        }
        Self {
            token: Arc::new(RwLock::new(restored)),
            store: Some(store),
        }
    }

    /// Current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Start a session with a freshly issued token.
    pub fn begin(&self, token: String) {
        if let Some(store) = &self.store
            && let Err(e) = store.save(&token)
        {
            warn!("Failed to persist session: {}", e);
        }
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    /// Drop the token from memory and disk.
    pub fn end(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        if let Some(store) = &self.store
            && let Err(e) = store.clear()
        {
            warn!("Failed to remove session file: {}", e);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.store)
            .finish()
    }
}
