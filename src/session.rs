use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

use crate::models::Role;

/// Fixed name under which the token is persisted.
pub const TOKEN_STORAGE_KEY: &str = "staynest_token";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Emitted through the session store's broadcast channel. The embedding
/// application subscribes once and owns what happens next (e.g. routing
/// back to the login view); the data layer never navigates by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Invalidated,
}

/// What the client persists between runs: the opaque token plus enough
/// identity to gate which views render. Not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

/// Persistence seam for the single token slot.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<StoredSession>;
    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Keeps the session for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<StoredSession>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<StoredSession> {
        self.slot.read().clone()
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.slot.write() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.write() = None;
        Ok(())
    }
}

/// Persists the session as a JSON file named after the fixed storage key.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{TOKEN_STORAGE_KEY}.json")),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<StoredSession> {
        // Unreadable or corrupt files are treated as signed out.
        let raw = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        let raw = serde_json::to_string(session)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// The session context: explicit get/set/clear over the one shared mutable
/// slot, plus the single subscription point for invalidation events.
pub struct SessionStore {
    store: Box<dyn TokenStore>,
    current: RwLock<Option<StoredSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        let current = store.load();
        let (events, _) = broadcast::channel(8);
        Self {
            store,
            current: RwLock::new(current),
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::<MemoryTokenStore>::default())
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    pub fn session(&self) -> Option<StoredSession> {
        self.current.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.current.read().as_ref().map(|s| s.role)
    }

    /// Written only by the login flow. The in-process slot is updated
    /// even when persistence fails; the error reports the persistence
    /// problem alone.
    pub fn set(&self, session: StoredSession) -> Result<(), SessionError> {
        *self.current.write() = Some(session.clone());
        self.store.save(&session)
    }

    /// Written by logout.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.current.write() = None;
        self.store.clear()
    }

    /// Written by the unauthorized-response handler: evict the token and
    /// notify whoever is listening. Storage failures are logged rather
    /// than propagated so the eviction itself always takes effect.
    pub fn invalidate(&self) {
        *self.current.write() = None;
        if let Err(error) = self.store.clear() {
            warn!(%error, "failed to clear persisted session");
        }
        let _ = self.events.send(SessionEvent::Invalidated);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
