//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::SessionCache;
use crate::history::HistoryService;
use crate::planner::TripService;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Trip search and confirmation
    pub trips: Arc<dyn TripService>,

    /// Travel history, usually the same backend as `trips`
    pub history: Arc<dyn HistoryService>,

    /// Live browser sessions
    pub sessions: Arc<SessionCache>,
}

impl AppState {
    /// Create a new app state around one trips backend.
    pub fn new<B>(backend: B, sessions: SessionCache) -> Self
    where
        B: TripService + HistoryService + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            trips: backend.clone(),
            history: backend,
            sessions: Arc::new(sessions),
        }
    }
}
