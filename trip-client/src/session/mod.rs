//! User session identity.
//!
//! The identity obtained at login is carried by an explicit
//! `SessionContext`, handed to the planner and the history browser. It is
//! initialised from the `SessionStore` (so a reload keeps the user signed
//! in) and torn down on logout.

mod context;
mod error;
mod store;

pub use context::SessionContext;
pub use error::SessionError;
pub use store::SessionStore;
