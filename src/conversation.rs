//! Conversation state machine
//!
//! Elm-style: a pure transition function maps (session, event) to a new
//! session plus effects. The store executes the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConversationState, RequestId, Session};
pub use transition::{transition, TransitionError};
