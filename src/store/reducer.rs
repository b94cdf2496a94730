//! Pure reducer for store actions
//!
//! Given the same state and action, `reduce` always produces the same result
//! and performs no I/O.

use super::action::Action;
use super::model::{Conversation, Message, MessageFeedback};
use super::state::StoreState;

/// Why an action left the state untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    DuplicateConversation,
    UnknownConversation,
    UnknownMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Result of a reduction
#[derive(Debug)]
pub struct Reduction {
    pub state: StoreState,
    pub outcome: Outcome,
}

impl Reduction {
    fn applied(state: StoreState) -> Self {
        Self {
            state,
            outcome: Outcome::Applied,
        }
    }

    fn ignored(state: &StoreState, reason: IgnoreReason) -> Self {
        Self {
            state: state.clone(),
            outcome: Outcome::Ignored(reason),
        }
    }
}

/// Apply one action. Lookups are linear scans over conversations and messages.
pub fn reduce(state: &StoreState, action: Action) -> Reduction {
    match action {
        Action::CreateConversation {
            conversation_id,
            timestamp,
        } => {
            if state.conversation(&conversation_id).is_some() {
                return Reduction::ignored(state, IgnoreReason::DuplicateConversation);
            }
            let mut next = state.clone();
            next.conversations
                .push(Conversation::new(conversation_id.clone(), timestamp));
            next.active_conversation_id = Some(conversation_id);
            Reduction::applied(next)
        }

        // Unknown ids are rejected so the active pointer never dangles
        Action::SetActiveConversation { conversation_id } => {
            if state.conversation(&conversation_id).is_none() {
                return Reduction::ignored(state, IgnoreReason::UnknownConversation);
            }
            let mut next = state.clone();
            next.active_conversation_id = Some(conversation_id);
            Reduction::applied(next)
        }

        Action::AddMessage {
            conversation_id,
            message_id,
            content,
            sender,
            timestamp,
        } => {
            let mut next = state.clone();
            let Some(conversation) = next.conversation_mut(&conversation_id) else {
                return Reduction::ignored(state, IgnoreReason::UnknownConversation);
            };
            // Keep timestamps non-decreasing within a conversation
            let timestamp = conversation
                .last_timestamp()
                .map_or(timestamp, |last| last.max(timestamp));
            conversation.messages.push(Message {
                id: message_id,
                content,
                sender,
                timestamp,
                feedback: None,
            });
            Reduction::applied(next)
        }

        Action::UpdateFeedback {
            conversation_id,
            message_id,
            patch,
        } => {
            let mut next = state.clone();
            let Some(conversation) = next.conversation_mut(&conversation_id) else {
                return Reduction::ignored(state, IgnoreReason::UnknownConversation);
            };
            let Some(message) = conversation
                .messages
                .iter_mut()
                .find(|m| m.id == message_id)
            else {
                return Reduction::ignored(state, IgnoreReason::UnknownMessage);
            };
            message
                .feedback
                .get_or_insert_with(MessageFeedback::default)
                .merge(&patch);
            Reduction::applied(next)
        }

        Action::RateConversation {
            conversation_id,
            rating,
            feedback,
        } => {
            let mut next = state.clone();
            let Some(conversation) = next.conversation_mut(&conversation_id) else {
                return Reduction::ignored(state, IgnoreReason::UnknownConversation);
            };
            conversation.rating = Some(rating);
            if let Some(text) = feedback.filter(|t| !t.is_empty()) {
                conversation.feedback = Some(text);
            }
            Reduction::applied(next)
        }

        Action::ToggleTheme => {
            let mut next = state.clone();
            next.theme = next.theme.toggled();
            Reduction::applied(next)
        }
    }
}
