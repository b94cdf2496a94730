//! Chat view state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions: the
//! view's transient state plus a read-only store snapshot go in, a new view
//! state and a list of effects come out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ChatState, ChatView, PendingReply, RequestId, REPLY_FAILED_MESSAGE};
pub use transition::{transition, TransitionError, TransitionResult};
