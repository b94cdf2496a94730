//! Transient chat view state

use crate::store::ConversationId;
use serde::Serialize;

/// User-visible message shown when a reply fails
pub const REPLY_FAILED_MESSAGE: &str = "Failed to get AI response. Please try again.";

/// Request id for matching replies to the request that caused them
pub type RequestId = u64;

/// An outgoing message waiting for (or having failed to get) a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingReply {
    pub request_id: RequestId,
    /// Captured at submit time; a late reply lands here even if the
    /// active conversation changed meanwhile
    pub conversation_id: ConversationId,
    pub text: String,
}

/// UI-only fields of the chat view. Never stored, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub input: String,
    pub in_flight: Option<PendingReply>,
    pub error: Option<String>,
    /// Last request whose reply failed, kept for retry
    pub failed: Option<PendingReply>,
    pub next_request_id: RequestId,
}

impl ChatState {
    pub fn is_awaiting_reply(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_retry(&self) -> bool {
        self.failed.is_some() && self.in_flight.is_none()
    }

    /// Projection handed to views
    pub fn view(&self) -> ChatView {
        ChatView {
            input: self.input.clone(),
            awaiting_reply: self.is_awaiting_reply(),
            error: self.error.clone(),
            can_retry: self.can_retry(),
        }
    }
}

/// What the chat view renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatView {
    pub input: String,
    pub awaiting_reply: bool,
    pub error: Option<String>,
    pub can_retry: bool,
}
