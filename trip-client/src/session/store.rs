//! Disk-backed store of session identities.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use tracing::{debug, warn};

use crate::domain::UserId;

use super::error::SessionError;

/// How long an identity is kept after it was last used.
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// One remembered identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    user: UserId,
    /// Unix seconds of the login or last restore
    last_used: i64,
}

/// On-disk layout of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSessions {
    /// Session token → user identity.
    sessions: HashMap<String, StoredSession>,
}

/// Maps session tokens to the identity that logged in with them.
///
/// A missing or unreadable file reads as empty. Writes rewrite the whole
/// file; a process-wide lock serialises read-modify-write cycles. Entries
/// unused for longer than the maximum age read as absent and are dropped
/// on the next write.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    max_age: Duration,
    lock: Arc<Mutex<()>>,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: DEFAULT_MAX_AGE,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Set how long an unused identity is remembered.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an entry last used at `last_used` has outlived the maximum age.
    fn is_stale(&self, last_used: i64, now: i64) -> bool {
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        now.saturating_sub(last_used) > max_age
    }

    /// Whether a token has a live identity on file.
    pub fn contains(&self, token: &str) -> bool {
        let _guard = self.lock.lock();
        let now = Utc::now().timestamp();
        self.read()
            .sessions
            .get(token)
            .is_some_and(|entry| !self.is_stale(entry.last_used, now))
    }

    /// Look up the identity for a token, marking it used.
    pub fn load(&self, token: &str) -> Option<UserId> {
        let _guard = self.lock.lock();
        let now = Utc::now().timestamp();
        let mut stored = self.read();
        let entry = stored.sessions.get_mut(token)?;
        if self.is_stale(entry.last_used, now) {
            return None;
        }
        entry.last_used = now;
        let user = entry.user.clone();

        if let Err(e) = self.write(&mut stored) {
            warn!(error = %e, "failed to refresh stored session");
        }
        Some(user)
    }

    /// Record the identity for a token.
    pub fn save(&self, token: &str, user: &UserId) -> Result<(), SessionError> {
        let _guard = self.lock.lock();
        let mut stored = self.read();
        stored.sessions.insert(
            token.to_string(),
            StoredSession {
                user: user.clone(),
                last_used: Utc::now().timestamp(),
            },
        );
        self.write(&mut stored)
    }

    /// Forget a token. Removing an unknown token is not an error.
    pub fn remove(&self, token: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock();
        let mut stored = self.read();
        if stored.sessions.remove(token).is_none() {
            return Ok(());
        }
        self.write(&mut stored)
    }

    fn read(&self) -> StoredSessions {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    /// Rewrite the file, leaving out stale entries.
    fn write(&self, stored: &mut StoredSessions) -> Result<(), SessionError> {
        let now = Utc::now().timestamp();
        let before = stored.sessions.len();
        stored
            .sessions
            .retain(|_, entry| !self.is_stale(entry.last_used, now));
        let pruned = before - stored.sessions.len();
        if pruned > 0 {
            debug!(pruned, "dropped stale stored sessions");
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json =
            serde_json::to_string_pretty(stored).map_err(|e| SessionError::Serialize {
                message: e.to_string(),
            })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("sessions.json"));

        store.save("tok-a", &user("7")).unwrap();
        assert_eq!(store.load("tok-a"), Some(user("7")));
        assert_eq!(store.load("tok-b"), None);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load("anything"), None);
    }

    #[test]
    fn corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, "not json").unwrap();

        let store = SessionStore::new(&path);
        assert_eq!(store.load("tok"), None);

        // Saving replaces the corrupt contents
        store.save("tok", &user("1")).unwrap();
        assert_eq!(store.load("tok"), Some(user("1")));
    }

    #[test]
    fn remove_forgets_only_that_token() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("sessions.json"));
        store.save("a", &user("1")).unwrap();
        store.save("b", &user("2")).unwrap();

        store.remove("a").unwrap();
        assert_eq!(store.load("a"), None);
        assert_eq!(store.load("b"), Some(user("2")));

        store.remove("never-saved").unwrap();
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dir").join("sessions.json");
        let store = SessionStore::new(&path);

        store.save("tok", &user("9")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        SessionStore::new(&path).save("tok", &user("3")).unwrap();

        assert_eq!(SessionStore::new(&path).load("tok"), Some(user("3")));
    }

    #[test]
    fn stale_entries_are_absent_and_pruned() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        let month_ago = Utc::now().timestamp() - 31 * 24 * 60 * 60;
        std::fs::write(
            &path,
            serde_json::json!({
                "sessions": {
                    "old": {"user": "1", "last_used": month_ago},
                }
            })
            .to_string(),
        )
        .unwrap();

        let store = SessionStore::new(&path);
        assert!(!store.contains("old"));
        assert_eq!(store.load("old"), None);

        store.save("new", &user("2")).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("\"old\""));
        assert!(store.contains("new"));
    }

    #[test]
    fn max_age_is_configurable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        let two_hours_ago = Utc::now().timestamp() - 2 * 60 * 60;
        std::fs::write(
            &path,
            serde_json::json!({
                "sessions": {"tok": {"user": "5", "last_used": two_hours_ago}}
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(SessionStore::new(&path).load("tok"), Some(user("5")));
        let strict = SessionStore::new(&path).with_max_age(Duration::from_secs(60 * 60));
        // Loading above refreshed the entry
        assert_eq!(strict.load("tok"), Some(user("5")));

        std::fs::write(
            &path,
            serde_json::json!({
                "sessions": {"tok": {"user": "5", "last_used": two_hours_ago}}
            })
            .to_string(),
        )
        .unwrap();
        assert_eq!(strict.load("tok"), None);
    }
}
