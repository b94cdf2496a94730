//! Conversation store
//!
//! Owns the conversation collection and the active-conversation pointer.
//! Mutations are expressed as [`Action`]s and applied by the pure [`reduce`]
//! function; the [`Store`] only mints ids and timestamps around it.

pub mod action;
pub mod model;
pub(crate) mod reducer;
pub mod state;

#[cfg(test)]
mod proptests;

pub use action::Action;
pub use model::{
    Conversation, ConversationId, FeedbackPatch, Message, MessageFeedback, MessageId, Rating,
    Sender, StoreError, Theme, Verdict,
};
pub use reducer::{reduce, IgnoreReason, Outcome, Reduction};
pub use state::{ConversationSummary, StoreState};

use chrono::{DateTime, Utc};

/// Source of creation timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Explicit state container, owned by whoever drives the application
pub struct Store {
    state: StoreState,
    clock: Box<dyn Clock>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            state: StoreState::default(),
            clock: Box::new(clock),
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Apply an action, replacing the whole state with the reduced one
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let name = action.name();
        let Reduction { state, outcome } = reduce(&self.state, action);
        self.state = state;
        if let Outcome::Ignored(reason) = outcome {
            tracing::debug!(action = name, ?reason, "Action ignored");
        }
        outcome
    }

    /// Create an empty conversation and make it active
    pub fn create_conversation(&mut self) -> ConversationId {
        let conversation_id = ConversationId::generate();
        self.dispatch(Action::CreateConversation {
            conversation_id: conversation_id.clone(),
            timestamp: self.clock.now(),
        });
        tracing::info!(conversation_id = %conversation_id, "Created conversation");
        conversation_id
    }

    pub fn set_active_conversation(&mut self, conversation_id: &ConversationId) -> Outcome {
        self.dispatch(Action::SetActiveConversation {
            conversation_id: conversation_id.clone(),
        })
    }

    /// Append a message. Returns the new id, or `None` when the conversation is unknown.
    pub fn add_message(
        &mut self,
        conversation_id: &ConversationId,
        content: impl Into<String>,
        sender: Sender,
    ) -> Option<MessageId> {
        let message_id = MessageId::generate();
        let outcome = self.dispatch(Action::AddMessage {
            conversation_id: conversation_id.clone(),
            message_id: message_id.clone(),
            content: content.into(),
            sender,
            timestamp: self.clock.now(),
        });
        outcome.is_applied().then_some(message_id)
    }

    pub fn update_feedback(
        &mut self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        patch: FeedbackPatch,
    ) -> Outcome {
        self.dispatch(Action::UpdateFeedback {
            conversation_id: conversation_id.clone(),
            message_id: message_id.clone(),
            patch,
        })
    }

    pub fn rate_conversation(
        &mut self,
        conversation_id: &ConversationId,
        rating: Rating,
        feedback: Option<String>,
    ) -> Outcome {
        self.dispatch(Action::RateConversation {
            conversation_id: conversation_id.clone(),
            rating,
            feedback,
        })
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.dispatch(Action::ToggleTheme);
        self.state.theme
    }
}
