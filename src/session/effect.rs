//! Effects produced by chat view transitions

use super::state::PendingReply;
use crate::store::{ConversationId, FeedbackPatch, MessageId, Sender};

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message through the store
    AppendMessage {
        conversation_id: ConversationId,
        content: String,
        sender: Sender,
    },

    /// Merge like/dislike flags into a message
    UpdateFeedback {
        conversation_id: ConversationId,
        message_id: MessageId,
        patch: FeedbackPatch,
    },

    /// Ask the simulator for a reply (runs as a background task)
    RequestReply { request: PendingReply },
}

impl Effect {
    pub fn append_user_message(conversation_id: ConversationId, content: String) -> Self {
        Effect::AppendMessage {
            conversation_id,
            content,
            sender: Sender::User,
        }
    }

    pub fn append_assistant_message(conversation_id: ConversationId, content: String) -> Self {
        Effect::AppendMessage {
            conversation_id,
            content,
            sender: Sender::Assistant,
        }
    }
}
