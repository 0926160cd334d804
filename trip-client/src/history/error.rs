//! History browser errors.

use crate::planner::RequestFailed;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    /// History is per user; nobody is logged in
    #[error("please log in first")]
    NotLoggedIn,

    #[error("rating must be between 0 and 5, got {0}")]
    InvalidRating(u8),

    #[error("no trip selected")]
    NothingSelected,

    /// The id is not on the current page
    #[error("no history entry {0} on this page")]
    NoSuchEntry(i64),

    #[error("already on the last page")]
    LastPage,

    #[error(transparent)]
    Request(#[from] RequestFailed),
}
