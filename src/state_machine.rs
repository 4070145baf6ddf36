//! Checklist session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! events in, new state plus effects out. The runtime owns I/O.

pub mod action;
pub(crate) mod dispatch;
mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{SessionContext, SessionState};
pub use transition::transition;
