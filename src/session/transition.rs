//! Pure state transition function for the chat view
//!
//! Given the same inputs, `transition` always produces the same outputs, with
//! no I/O. The store is read, never written; writes happen through effects.

use super::{ChatState, Effect, Event, PendingReply, RequestId, REPLY_FAILED_MESSAGE};
use crate::store::StoreState;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// Nothing changes
    pub fn unchanged(state: &ChatState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A reply is still pending, wait for it before sending again")]
    ReplyPending,
}

pub fn transition(
    state: &ChatState,
    store: &StoreState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::InputChanged(input) => Ok(TransitionResult::new(ChatState {
            input,
            ..state.clone()
        })),

        // ============================================================
        // Submission
        // ============================================================
        Event::Submit => {
            // Empty input or nothing selected: silently nothing to do
            let Some(conversation_id) = store.active_conversation().map(|c| c.id.clone()) else {
                return Ok(TransitionResult::unchanged(state));
            };
            if state.input.trim().is_empty() {
                return Ok(TransitionResult::unchanged(state));
            }
            if state.in_flight.is_some() {
                return Err(TransitionError::ReplyPending);
            }

            let request = PendingReply {
                request_id: state.next_request_id,
                conversation_id: conversation_id.clone(),
                text: state.input.clone(),
            };
            let new_state = ChatState {
                input: String::new(),
                in_flight: Some(request.clone()),
                error: None,
                failed: None,
                next_request_id: state.next_request_id + 1,
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::append_user_message(
                    conversation_id,
                    state.input.clone(),
                ))
                .with_effect(Effect::RequestReply { request }))
        }

        // Resends the failed text to its original conversation; the user
        // message is already recorded so it is not appended again
        Event::Retry => {
            if state.in_flight.is_some() {
                return Err(TransitionError::ReplyPending);
            }
            let Some(failed) = &state.failed else {
                return Ok(TransitionResult::unchanged(state));
            };

            let request = PendingReply {
                request_id: state.next_request_id,
                ..failed.clone()
            };
            let new_state = ChatState {
                in_flight: Some(request.clone()),
                error: None,
                failed: None,
                next_request_id: state.next_request_id + 1,
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state).with_effect(Effect::RequestReply { request }))
        }

        // ============================================================
        // Simulator outcomes
        // ============================================================
        Event::ReplyReceived { request_id, text } => {
            let Some(pending) = matching_request(state, request_id) else {
                return Ok(TransitionResult::unchanged(state));
            };
            let conversation_id = pending.conversation_id.clone();
            let new_state = ChatState {
                in_flight: None,
                error: None,
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::append_assistant_message(conversation_id, text)))
        }

        Event::ReplyFailed { request_id, .. } => {
            let Some(pending) = matching_request(state, request_id) else {
                return Ok(TransitionResult::unchanged(state));
            };
            let new_state = ChatState {
                in_flight: None,
                error: Some(REPLY_FAILED_MESSAGE.to_string()),
                failed: Some(pending.clone()),
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state))
        }

        // ============================================================
        // Message feedback (assistant messages of the active conversation)
        // ============================================================
        Event::MessageFeedback {
            message_id,
            verdict,
        } => {
            let Some(conversation) = store.active_conversation() else {
                return Ok(TransitionResult::unchanged(state));
            };
            match conversation.message(&message_id) {
                Some(message) if message.is_from_assistant() => {
                    Ok(TransitionResult::unchanged(state).with_effect(Effect::UpdateFeedback {
                        conversation_id: conversation.id.clone(),
                        message_id,
                        patch: verdict.to_patch(),
                    }))
                }
                _ => Ok(TransitionResult::unchanged(state)),
            }
        }
    }
}

fn matching_request(state: &ChatState, request_id: RequestId) -> Option<&PendingReply> {
    state
        .in_flight
        .as_ref()
        .filter(|pending| pending.request_id == request_id)
}
