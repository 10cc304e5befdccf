//! Session storage: who is currently signed in.

use maand_auth::Role;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// A signed-in identity plus its bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Bearer token for authenticated requests.
    pub token: String,
}

// The token must not leak through debug output.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Where the current session lives.
///
/// The gateway and route guard only see this trait, so the storage medium
/// (memory, file, something platform-specific) is swappable.
pub trait SessionStore: Send + Sync {
    /// Current session, if any.
    fn get(&self) -> Option<Session>;
    /// Replace the current session.
    fn set(&self, session: Session);
    /// Drop the current session. Clearing an empty store is a no-op.
    fn clear(&self);
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.current.read().clone()
    }

    fn set(&self, session: Session) {
        *self.current.write() = Some(session);
    }

    fn clear(&self) {
        *self.current.write() = None;
    }
}

/// File-backed session store (one JSON document).
///
/// A missing or unreadable file reads as "not signed in"; a corrupt file is
/// treated the same rather than erroring, since the only recovery is signing
/// in again anyway.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store the session at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn set(&self, session: Session) {
        let raw = match serde_json::to_string(&session) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize session");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, raw) {
            tracing::warn!(error = %e, path = %self.path.display(), "Failed to persist session");
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %self.path.display(), "Failed to remove session file");
            }
        }
    }
}
