//! Property-based tests for the chat view state machine

use super::*;
use crate::store::{reduce, Action, ConversationId, MessageId, StoreState, Verdict};
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_store() -> impl Strategy<Value = StoreState> {
    (0usize..3).prop_map(|count| {
        (0..count).fold(StoreState::default(), |state, i| {
            reduce(
                &state,
                Action::CreateConversation {
                    conversation_id: ConversationId::from(format!("c{i}").as_str()),
                    timestamp: Utc::now(),
                },
            )
            .state
        })
    })
}

fn arb_verdict() -> impl Strategy<Value = Verdict> {
    prop_oneof![Just(Verdict::Like), Just(Verdict::Dislike)]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(Event::InputChanged),
        Just(Event::Submit),
        Just(Event::Retry),
        ("m[0-2]", arb_verdict()).prop_map(|(id, verdict)| Event::MessageFeedback {
            message_id: MessageId::from(id.as_str()),
            verdict,
        }),
        (0u64..4, "[a-z]{1,8}").prop_map(|(request_id, text)| Event::ReplyReceived {
            request_id,
            text,
        }),
        (0u64..4, "[a-z]{1,8}").prop_map(|(request_id, message)| Event::ReplyFailed {
            request_id,
            message,
        }),
    ]
}

/// Drive a sequence of events, skipping rejected ones like the runtime does
fn run(store: &StoreState, events: Vec<Event>) -> Vec<(ChatState, Vec<Effect>)> {
    let mut state = ChatState::default();
    let mut trace = Vec::new();
    for event in events {
        if let Ok(result) = transition(&state, store, event) {
            state = result.new_state.clone();
            trace.push((result.new_state, result.effects));
        }
    }
    trace
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_at_most_one_request_in_flight(
        store in arb_store(),
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        let mut in_flight = false;
        for (state, effects) in run(&store, events) {
            let requests = effects
                .iter()
                .filter(|e| matches!(e, Effect::RequestReply { .. }))
                .count();
            prop_assert!(requests <= 1);
            if requests == 1 {
                prop_assert!(!in_flight, "second request issued while one was pending");
            }
            in_flight = state.in_flight.is_some();
        }
    }

    #[test]
    fn prop_error_and_in_flight_are_exclusive(
        store in arb_store(),
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        for (state, _) in run(&store, events) {
            prop_assert!(!(state.error.is_some() && state.in_flight.is_some()));
        }
    }

    #[test]
    fn prop_request_ids_strictly_increase(
        store in arb_store(),
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        let mut last: Option<RequestId> = None;
        for (_, effects) in run(&store, events) {
            for effect in effects {
                if let Effect::RequestReply { request } = effect {
                    if let Some(previous) = last {
                        prop_assert!(request.request_id > previous);
                    }
                    last = Some(request.request_id);
                }
            }
        }
    }

    #[test]
    fn prop_assistant_messages_only_from_replies(
        store in arb_store(),
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        // Every assistant append must be paired with a request issued earlier
        let mut issued = 0usize;
        let mut answered = 0usize;
        for (_, effects) in run(&store, events) {
            for effect in effects {
                match effect {
                    Effect::RequestReply { .. } => issued += 1,
                    Effect::AppendMessage { sender: crate::store::Sender::Assistant, .. } => {
                        answered += 1;
                    }
                    _ => {}
                }
            }
            prop_assert!(answered <= issued);
        }
    }

    #[test]
    fn prop_input_changes_have_no_effects(
        store in arb_store(),
        text in "[a-z ]{0,12}",
    ) {
        let event = Event::InputChanged(text.clone());
        let result = transition(&ChatState::default(), &store, event).unwrap();
        prop_assert!(result.effects.is_empty());
        prop_assert_eq!(result.new_state.input, text);
    }
}
