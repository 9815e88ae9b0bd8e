//! Session store: the single source of truth for "who is signed in". Holds
//! the bearer token and a cached profile behind a lock so a token swap is
//! atomic from the point of view of every reader, and persists the pair so a
//! restart can restore the session before anything else runs.

pub mod persist;
pub mod token;

use crate::session::persist::{PersistedSession, SessionPersistence};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use tracing::{debug, warn};

/// Identity class reported by the backend for a profile.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityClass {
    #[default]
    User,
    Agent,
}

/// Cached copy of the canonical profile owned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub identity_class: IdentityClass,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub mandi_name: Option<String>,
    #[serde(default)]
    pub consent_given: bool,
}

/// Point-in-time snapshot of the current session.
#[derive(Clone, Default)]
pub struct Session {
    pub token: Option<SecretString>,
    pub user: Option<UserProfile>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Default)]
struct Inner {
    token: Option<SecretString>,
    user: Option<UserProfile>,
}

/// Process-wide holder of the current session. All writes go through `&self`
/// methods; everything else only reads snapshots.
pub struct SessionStore {
    inner: RwLock<Inner>,
    // Bumped on every token swap or logout. Async flows capture the epoch
    // before awaiting and drop results that arrive for an older session.
    epoch: AtomicU64,
    persistence: Box<dyn SessionPersistence>,
}

impl SessionStore {
    #[must_use]
    pub fn new(persistence: Box<dyn SessionPersistence>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            epoch: AtomicU64::new(0),
            persistence,
        }
    }

    /// Current session epoch. Changes whenever the token is swapped or cleared.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Non-blocking snapshot of the current token and cached profile.
    pub fn snapshot(&self) -> Session {
        let inner = self.read();
        Session {
            token: inner.token.clone(),
            user: inner.user.clone(),
        }
    }

    /// Current bearer token, if any.
    pub fn current_token(&self) -> Option<SecretString> {
        self.read().token.clone()
    }

    /// Installs or clears the current token and keeps persisted state in sync.
    pub fn set_token(&self, token: Option<SecretString>) {
        {
            let mut inner = self.write();
            match &token {
                Some(value) => {
                    // A replacement token may belong to a different account,
                    // so the previous profile must not ride along with it.
                    inner.user = None;
                    let record = PersistedSession {
                        token: value.expose_secret().to_string(),
                        user: None,
                    };
                    if let Err(e) = self.persistence.save(&record) {
                        warn!("Could not persist session: {e}");
                    }
                }
                None => {
                    if let Err(e) = self.persistence.clear() {
                        warn!("Could not clear persisted session: {e}");
                    }
                    inner.user = None;
                }
            }
            inner.token = token;
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Merges a freshly fetched profile into the session.
    ///
    /// `consent_given` is monotonic: once the cached profile says consent was
    /// given, a stale fetch must not flip it back.
    pub fn set_user(&self, mut user: UserProfile) {
        let mut inner = self.write();
        if let Some(cached) = &inner.user {
            if cached.id == user.id && cached.consent_given && !user.consent_given {
                debug!("Keeping consent_given=true for user {}", user.id);
                user.consent_given = true;
            }
        }
        inner.user = Some(user);
        self.save_locked(&inner);
    }

    /// Flips the cached profile to consented after a successful acknowledgment.
    /// No profile re-fetch is required.
    pub fn mark_consented(&self) {
        let mut inner = self.write();
        if let Some(user) = inner.user.as_mut() {
            user.consent_given = true;
        }
        self.save_locked(&inner);
    }

    /// Restores a previously persisted session, if any. A corrupt or
    /// unreadable record is treated as "no session", never as an error.
    pub fn hydrate(&self) {
        let restored = match self.persistence.load() {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(e) => {
                warn!("Could not restore persisted session, starting signed out: {e}");
                return;
            }
        };

        {
            let mut inner = self.write();
            inner.token = Some(SecretString::from(restored.token));
            inner.user = restored.user;
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Clears the token, the cached profile, and the persisted record.
    /// Always succeeds locally; persistence failures are logged only.
    pub fn logout(&self) {
        {
            let mut inner = self.write();
            inner.token = None;
            inner.user = None;
        }
        if let Err(e) = self.persistence.clear() {
            warn!("Could not clear persisted session: {e}");
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    fn save_locked(&self, inner: &Inner) {
        if let Some(current) = &inner.token {
            let record = PersistedSession {
                token: current.expose_secret().to_string(),
                user: inner.user.clone(),
            };
            if let Err(e) = self.persistence.save(&record) {
                warn!("Could not persist session: {e}");
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
