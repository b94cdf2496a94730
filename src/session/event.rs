//! Events handled by the chat view

use super::state::RequestId;
use crate::store::{MessageId, Verdict};

/// Events that trigger chat view transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // User events
    InputChanged(String),
    Submit,
    Retry,
    MessageFeedback {
        message_id: MessageId,
        verdict: Verdict,
    },

    // Simulator events
    ReplyReceived {
        request_id: RequestId,
        text: String,
    },
    ReplyFailed {
        request_id: RequestId,
        message: String,
    },
}
