//! Registry of live browser sessions.
//!
//! Each browser gets a random token (carried in a cookie) that maps to its
//! own planner, history browser and identity. Sessions expire after a
//! period of inactivity; the identity outlives them in the session store,
//! so a returning browser with the same token is still logged in. Tokens
//! are only ever minted here.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::history::HistoryBrowser;
use crate::planner::{PlannerConfig, TripPlanner};
use crate::session::{SessionContext, SessionStore};

/// Length of an encoded token: 16 random bytes in unpadded base64.
const TOKEN_LEN: usize = 22;

/// Configuration for the session cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// A session unused for this long is dropped.
    pub time_to_idle: Duration,

    /// Maximum number of live sessions.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            time_to_idle: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Everything one browser works with.
///
/// Clones share state. The planner and history browser each sit behind
/// their own async lock.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    pub context: SessionContext,
    pub planner: Arc<Mutex<TripPlanner>>,
    pub history: Arc<Mutex<HistoryBrowser>>,
}

impl BrowserSession {
    fn new(context: SessionContext, planner_config: Arc<PlannerConfig>) -> Self {
        Self {
            planner: Arc::new(Mutex::new(TripPlanner::new(planner_config))),
            history: Arc::new(Mutex::new(HistoryBrowser::new(context.clone()))),
            context,
        }
    }

    pub fn token(&self) -> &str {
        self.context.token()
    }
}

/// Generate a fresh session token.
pub fn new_token() -> String {
    URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes())
}

/// Whether a cookie value could be a token we issued.
pub fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && URL_SAFE_NO_PAD
            .decode(token)
            .is_ok_and(|bytes| bytes.len() == 16)
}

/// Cache of live browser sessions keyed by token.
pub struct SessionCache {
    sessions: MokaCache<Arc<str>, BrowserSession>,
    store: Option<SessionStore>,
    planner_config: Arc<PlannerConfig>,
}

impl SessionCache {
    /// Create a new cache. Without a store, identities last only as long
    /// as the session does.
    pub fn new(
        config: &CacheConfig,
        store: Option<SessionStore>,
        planner_config: PlannerConfig,
    ) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(config.time_to_idle)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            sessions,
            store,
            planner_config: Arc::new(planner_config),
        }
    }

    fn open(&self, token: &str) -> BrowserSession {
        let context = match &self.store {
            Some(store) => SessionContext::init(store.clone(), token),
            None => SessionContext::ephemeral(token),
        };
        BrowserSession::new(context, self.planner_config.clone())
    }

    /// Whether a presented token belongs to a session this server started.
    fn is_known(&self, token: &str) -> bool {
        self.sessions.contains_key(token)
            || self.store.as_ref().is_some_and(|store| store.contains(token))
    }

    /// The session for a cookie token, creating one when needed.
    ///
    /// A token that is live, or that has an identity on file, keeps its
    /// session; an expired one is reopened with its identity restored.
    /// Any other token is replaced, so a client cannot choose its own.
    /// The flag is true when a new token was issued.
    pub async fn get_or_create(&self, token: Option<&str>) -> (BrowserSession, bool) {
        let adopted = match token {
            Some(t) if is_valid_token(t) && self.is_known(t) => Some(t.to_string()),
            Some(_) => {
                debug!("replacing unknown session token");
                None
            }
            None => None,
        };
        let (token, issued) = match adopted {
            Some(token) => (token, false),
            None => (new_token(), true),
        };
        let key: Arc<str> = Arc::from(token.as_str());

        let session = self
            .sessions
            .get_with(key, async {
                debug!("opening browser session");
                self.open(&token)
            })
            .await;
        (session, issued)
    }

    /// Look up a live session without creating one.
    pub async fn get(&self, token: &str) -> Option<BrowserSession> {
        self.sessions.get(token).await
    }

    /// Drop a session. Its stored identity is untouched.
    pub async fn remove(&self, token: &str) {
        self.sessions.invalidate(token).await;
    }

    /// Number of live sessions (approximate, for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.sessions.entry_count()
    }
}
