//! Travel history: trips a user has confirmed in the past.
//!
//! History is paged five entries at a time. A selected entry can be
//! annotated with notes and a 0-5 rating, or deleted.

mod browser;
mod entry;
mod error;
mod service;

pub use browser::{HistoryBrowser, HistorySelection, PAGE_SIZE};
pub use entry::{HistoryEntry, HistoryLeg, HistoryUpdate, LegRow, format_wire_clock};
pub use error::HistoryError;
pub use service::HistoryService;
