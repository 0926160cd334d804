//! Web layer for the trip planner.
//!
//! Serves the planner and history pages and a JSON/HTML API that drives
//! each browser session's planner. Every planner action answers with the
//! full resulting snapshot.

mod cookie;
mod dto;
mod routes;
mod state;
pub mod templates;

pub use cookie::SESSION_COOKIE;
pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
