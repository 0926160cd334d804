//! Trip-planning state machine.
//!
//! This module owns the search lifecycle: the user builds a query from two
//! map points and a departure date/time, receives candidate itineraries,
//! inspects and selects one, and confirms it.
//!
//! ```text
//! Idle ──begin_query──▶ Querying ──complete_query──▶ Results ──select──▶ Selected
//!  ▲                       ▲  │ (superseded)            │                  │
//!  │                       └──┘                         └────begin_query───┤
//!  │                                                                       │
//!  └──complete_confirm (ok)── Confirming ◀──────────begin_confirm──────────┘
//! ```
//!
//! Network calls happen outside the machine: `begin_*` hands out a ticket,
//! the caller performs the request, and `complete_*` applies the response
//! only if the ticket is still current.

mod config;
mod driver;
mod error;
mod machine;
mod query;


pub use config::PlannerConfig;
pub use driver::{TripService, run_confirm, run_search};
pub use error::{PlanningError, QueryField, RequestFailed, SearchFailed};
pub use machine::{
    ConfirmOutcome, Notice, NoticeLevel, PhaseKind, QueryOutcome, SearchMessage, TripPlanner,
};
pub use query::{Acknowledgement, ConfirmTicket, Confirmation, PlanningQuery, QueryTicket, RequestId};
