//! Explicit session context.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::domain::UserId;

use super::error::SessionError;
use super::store::SessionStore;

/// The identity of whoever is using this browser session.
///
/// Cheap to clone; clones share the same identity, so a logout seen by the
/// history browser is also seen by the planner.
#[derive(Debug, Clone)]
pub struct SessionContext {
    token: Arc<str>,
    user: Arc<RwLock<Option<UserId>>>,
    store: Option<SessionStore>,
}

impl SessionContext {
    /// A session that is not persisted anywhere.
    pub fn ephemeral(token: impl Into<String>) -> Self {
        let token: String = token.into();
        Self {
            token: Arc::from(token),
            user: Arc::new(RwLock::new(None)),
            store: None,
        }
    }

    /// Initialise a session, restoring any identity previously saved for
    /// this token.
    pub fn init(store: SessionStore, token: impl Into<String>) -> Self {
        let token: String = token.into();
        let token: Arc<str> = Arc::from(token);
        let restored = store.load(&token);
        if let Some(user) = &restored {
            debug!(%user, "restored session identity");
        }
        Self {
            token,
            user: Arc::new(RwLock::new(restored)),
            store: Some(store),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// The logged-in user, if any.
    pub fn user(&self) -> Option<UserId> {
        self.user.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.read().is_some()
    }

    /// Record the identity handed over by the login flow.
    pub fn login(&self, user: UserId) -> Result<(), SessionError> {
        if let Some(store) = &self.store {
            store.save(&self.token, &user)?;
        }
        info!(%user, "session logged in");
        *self.user.write() = Some(user);
        Ok(())
    }

    /// Tear the session down: forget the identity here and in the store.
    pub fn logout(&self) -> Result<(), SessionError> {
        let previous = self.user.write().take();
        if let Some(store) = &self.store {
            store.remove(&self.token)?;
        }
        if let Some(user) = previous {
            info!(%user, "session logged out");
        }
        Ok(())
    }
}
