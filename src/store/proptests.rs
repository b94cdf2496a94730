//! Property-based tests for the store reducer
//!
//! These tests verify key invariants hold across arbitrary action sequences.

use super::*;
use chrono::TimeZone;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Small id pool so generated actions hit existing entities often
fn arb_conversation_id() -> impl Strategy<Value = ConversationId> {
    "c[0-3]".prop_map(|s| ConversationId::from(s.as_str()))
}

fn arb_message_id() -> impl Strategy<Value = MessageId> {
    "m[0-5]".prop_map(|s| MessageId::from(s.as_str()))
}

fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..1_000_000).prop_map(|ms| Utc.timestamp_millis_opt(ms).unwrap())
}

fn arb_sender() -> impl Strategy<Value = Sender> {
    prop_oneof![Just(Sender::User), Just(Sender::Assistant)]
}

fn arb_patch() -> impl Strategy<Value = FeedbackPatch> {
    (any::<Option<bool>>(), any::<Option<bool>>())
        .prop_map(|(liked, disliked)| FeedbackPatch { liked, disliked })
}

fn arb_rating() -> impl Strategy<Value = Rating> {
    (Rating::MIN..=Rating::MAX).prop_map(|r| Rating::new(r).unwrap())
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (arb_conversation_id(), arb_timestamp()).prop_map(|(conversation_id, timestamp)| {
            Action::CreateConversation {
                conversation_id,
                timestamp,
            }
        }),
        arb_conversation_id()
            .prop_map(|conversation_id| Action::SetActiveConversation { conversation_id }),
        (
            arb_conversation_id(),
            arb_message_id(),
            "[a-z ]{0,20}",
            arb_sender(),
            arb_timestamp()
        )
            .prop_map(|(conversation_id, message_id, content, sender, timestamp)| {
                Action::AddMessage {
                    conversation_id,
                    message_id,
                    content,
                    sender,
                    timestamp,
                }
            }),
        (arb_conversation_id(), arb_message_id(), arb_patch()).prop_map(
            |(conversation_id, message_id, patch)| Action::UpdateFeedback {
                conversation_id,
                message_id,
                patch,
            }
        ),
        (
            arb_conversation_id(),
            arb_rating(),
            proptest::option::of("[a-z]{0,10}")
        )
            .prop_map(|(conversation_id, rating, feedback)| {
                Action::RateConversation {
                    conversation_id,
                    rating,
                    feedback,
                }
            }),
        Just(Action::ToggleTheme),
    ]
}

fn arb_state() -> impl Strategy<Value = StoreState> {
    proptest::collection::vec(arb_action(), 0..30)
        .prop_map(|actions| apply_all(&StoreState::default(), actions))
}

fn apply_all(state: &StoreState, actions: Vec<Action>) -> StoreState {
    actions
        .into_iter()
        .fold(state.clone(), |state, action| reduce(&state, action).state)
}

fn total_messages(state: &StoreState) -> usize {
    state.conversations.iter().map(|c| c.messages.len()).sum()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_create_grows_by_one_and_activates(
        state in arb_state(),
        id in "[a-z]{12}",
        ts in arb_timestamp(),
    ) {
        let id = ConversationId::from(id.as_str());
        let result = reduce(&state, Action::CreateConversation {
            conversation_id: id.clone(),
            timestamp: ts,
        });

        prop_assert_eq!(result.state.conversations.len(), state.conversations.len() + 1);
        prop_assert_eq!(result.state.active_conversation_id, Some(id));
    }

    #[test]
    fn prop_active_id_never_dangles(actions in proptest::collection::vec(arb_action(), 0..40)) {
        let mut state = StoreState::default();
        for action in actions {
            state = reduce(&state, action).state;
            if let Some(active) = &state.active_conversation_id {
                prop_assert!(state.conversation(active).is_some());
            }
        }
    }

    #[test]
    fn prop_conversation_ids_stay_unique(
        actions in proptest::collection::vec(arb_action(), 0..40),
    ) {
        let state = apply_all(&StoreState::default(), actions);
        let mut ids: Vec<_> = state.conversations.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), state.conversations.len());
    }

    #[test]
    fn prop_ignored_actions_leave_state_unchanged(state in arb_state(), action in arb_action()) {
        let result = reduce(&state, action);
        if !result.outcome.is_applied() {
            prop_assert_eq!(result.state, state);
        }
    }

    #[test]
    fn prop_add_message_appends_exactly_one(
        state in arb_state(),
        content in "[a-z ]{0,20}",
        sender in arb_sender(),
        ts in arb_timestamp(),
    ) {
        prop_assume!(!state.conversations.is_empty());
        let target = state.conversations[0].id.clone();
        let before = state.conversations[0].clone();

        let result = reduce(&state, Action::AddMessage {
            conversation_id: target,
            message_id: MessageId::from("fresh"),
            content: content.clone(),
            sender,
            timestamp: ts,
        });
        let after = &result.state.conversations[0];

        prop_assert_eq!(after.messages.len(), before.messages.len() + 1);
        prop_assert_eq!(&after.messages[..before.messages.len()], &before.messages[..]);
        let appended = after.messages.last().unwrap();
        prop_assert_eq!(&appended.content, &content);
        prop_assert_eq!(appended.sender, sender);
        if let Some(previous) = before.last_timestamp() {
            prop_assert!(appended.timestamp >= previous);
        }
        prop_assert_eq!(total_messages(&result.state), total_messages(&state) + 1);
    }

    #[test]
    fn prop_update_feedback_is_idempotent(state in arb_state(), action in arb_action()) {
        if let Action::UpdateFeedback { .. } = &action {
            let once = reduce(&state, action.clone()).state;
            let twice = reduce(&once, action).state;
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn prop_messages_are_never_reordered(
        state in arb_state(),
        actions in proptest::collection::vec(arb_action(), 0..20),
    ) {
        let after = apply_all(&state, actions);
        prop_assert!(after.conversations.len() >= state.conversations.len());
        // Message ids may repeat in generated data, so compare by position
        for (before, conversation) in state.conversations.iter().zip(&after.conversations) {
            prop_assert_eq!(&conversation.id, &before.id);
            let prefix: Vec<_> = conversation.messages[..before.messages.len()]
                .iter()
                .map(|m| (&m.id, &m.content, m.sender, m.timestamp))
                .collect();
            let original: Vec<_> = before
                .messages
                .iter()
                .map(|m| (&m.id, &m.content, m.sender, m.timestamp))
                .collect();
            prop_assert_eq!(prefix, original);
        }
    }

    #[test]
    fn prop_rerate_replaces_and_keeps_comment(
        first in arb_rating(),
        second in arb_rating(),
        comment in "[a-z]{1,10}",
    ) {
        let id = ConversationId::from("c0");
        let state = reduce(&StoreState::default(), Action::CreateConversation {
            conversation_id: id.clone(),
            timestamp: Utc.timestamp_millis_opt(0).unwrap(),
        }).state;
        let state = reduce(&state, Action::RateConversation {
            conversation_id: id.clone(),
            rating: first,
            feedback: Some(comment.clone()),
        }).state;
        let state = reduce(&state, Action::RateConversation {
            conversation_id: id.clone(),
            rating: second,
            feedback: None,
        }).state;

        let conversation = state.conversation(&id).unwrap();
        prop_assert_eq!(conversation.rating, Some(second));
        prop_assert_eq!(conversation.feedback.as_deref(), Some(comment.as_str()));
    }
}
