//! Store state and read-only selectors

use super::model::{Conversation, ConversationId, Message, Rating, Theme};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the store knows. Replaced as one unit by each reduction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// Insertion order is listing order
    pub conversations: Vec<Conversation>,
    pub active_conversation_id: Option<ConversationId>,
    #[serde(default)]
    pub theme: Theme,
}

/// Sidebar entry for one conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
    pub rating: Option<Rating>,
    pub is_active: bool,
}

impl StoreState {
    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    pub(crate) fn conversation_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| &c.id == id)
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation_id
            .as_ref()
            .and_then(|id| self.conversation(id))
    }

    /// Messages of the active conversation, empty when nothing is selected
    pub fn active_messages(&self) -> &[Message] {
        self.active_conversation()
            .map_or(&[], |c| c.messages.as_slice())
    }

    pub fn conversation_summaries(&self) -> Vec<ConversationSummary> {
        self.conversations
            .iter()
            .map(|c| ConversationSummary {
                id: c.id.clone(),
                created_at: c.timestamp,
                message_count: c.messages.len(),
                rating: c.rating,
                is_active: self.active_conversation_id.as_ref() == Some(&c.id),
            })
            .collect()
    }
}
