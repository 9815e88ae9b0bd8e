//! Durable client-side storage for the session. The store only depends on the
//! `SessionPersistence` trait so the core logic stays testable without a real
//! storage backend.

use crate::session::UserProfile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

/// On-disk record: the access token plus the cached profile. The refresh
/// token travels as a cookie and is never written here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

pub trait SessionPersistence: Send + Sync {
    /// Returns the persisted session, or `None` when nothing was saved.
    fn load(&self) -> Result<Option<PersistedSession>>;
    fn save(&self, session: &PersistedSession) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// JSON file persistence, the default for the CLI.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionPersistence for FileSessionStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let record = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(record))
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}

/// In-memory persistence for tests.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    cell: Arc<Mutex<Option<PersistedSession>>>,
}

impl SessionPersistence for MemorySessionStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        Ok(self
            .cell
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        *self
            .cell
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self
            .cell
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_clears() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load()?.is_none());

        store.save(&PersistedSession {
            token: "abc".to_string(),
            user: None,
        })?;
        let restored = store.load()?.expect("record saved");
        assert_eq!(restored.token, "abc");

        store.clear()?;
        assert!(store.load()?.is_none());
        // Clearing twice is fine.
        store.clear()?;
        Ok(())
    }

    #[test]
    fn file_store_creates_missing_parent_directories() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileSessionStore::new(dir.path().join("nested/dir/session.json"));
        store.save(&PersistedSession {
            token: "abc".to_string(),
            user: None,
        })?;
        assert!(store.load()?.is_some());
        Ok(())
    }

    #[test]
    fn corrupt_file_surfaces_an_error_for_the_store_to_swallow() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json")?;
        let store = FileSessionStore::new(path);
        assert!(store.load().is_err());
        Ok(())
    }
}
