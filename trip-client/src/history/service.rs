use futures::future::BoxFuture;

use crate::domain::UserId;
use crate::planner::RequestFailed;

use super::entry::{HistoryEntry, HistoryLeg, HistoryUpdate};

/// The history endpoints of the trips API.
pub trait HistoryService: Send + Sync {
    /// One page (1-based) of a user's history.
    fn list_history<'a>(
        &'a self,
        user: &'a UserId,
        page: u32,
    ) -> BoxFuture<'a, Result<Vec<HistoryEntry>, RequestFailed>>;

    fn history_legs(&self, history_id: i64) -> BoxFuture<'_, Result<Vec<HistoryLeg>, RequestFailed>>;

    fn update_history<'a>(
        &'a self,
        history_id: i64,
        update: &'a HistoryUpdate,
    ) -> BoxFuture<'a, Result<(), RequestFailed>>;

    fn delete_history(&self, history_id: i64) -> BoxFuture<'_, Result<(), RequestFailed>>;
}
