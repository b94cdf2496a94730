//! Actions applied by the store reducer

use super::model::{ConversationId, FeedbackPatch, MessageId, Rating, Sender};
use chrono::{DateTime, Utc};

/// A fully-determined state change. Ids and timestamps are minted by the
/// [`Store`](super::Store) before the action reaches the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateConversation {
        conversation_id: ConversationId,
        timestamp: DateTime<Utc>,
    },
    SetActiveConversation {
        conversation_id: ConversationId,
    },
    AddMessage {
        conversation_id: ConversationId,
        message_id: MessageId,
        content: String,
        sender: Sender,
        timestamp: DateTime<Utc>,
    },
    UpdateFeedback {
        conversation_id: ConversationId,
        message_id: MessageId,
        patch: FeedbackPatch,
    },
    RateConversation {
        conversation_id: ConversationId,
        rating: Rating,
        /// Empty or missing text leaves the previous comment in place
        feedback: Option<String>,
    },
    ToggleTheme,
}

impl Action {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateConversation { .. } => "create_conversation",
            Action::SetActiveConversation { .. } => "set_active_conversation",
            Action::AddMessage { .. } => "add_message",
            Action::UpdateFeedback { .. } => "update_feedback",
            Action::RateConversation { .. } => "rate_conversation",
            Action::ToggleTheme => "toggle_theme",
        }
    }
}
