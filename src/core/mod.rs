//! Shared building blocks of the navigation state machines.
//!
//! - [`State`]: contract for machine phases
//! - [`StateHistory`]: tick-stamped transition log
//! - [`Pending`]: non-blocking handle for asynchronous collaborator answers

mod history;
mod pending;
mod state;

pub use history::{StateHistory, StateTransition};
pub use pending::{Completer, Pending, Poll};
pub use state::State;
