//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_request_id() -> impl Strategy<Value = RequestId> {
    (1u64..6).prop_map(RequestId::new)
}

fn arb_question() -> impl Strategy<Value = String> {
    "[a-zA-Z?][a-zA-Z ?]{0,30}"
}

fn arb_submit_event() -> impl Strategy<Value = Event> {
    (arb_request_id(), arb_question()).prop_map(|(request_id, text)| Event::QuestionSubmitted {
        request_id,
        prompt: format!("Act as a test and answer: {text}"),
        text,
    })
}

fn arb_reply_event() -> impl Strategy<Value = Event> {
    (arb_request_id(), "[a-zA-Z ]{0,30}")
        .prop_map(|(request_id, text)| Event::ModelReplied { request_id, text })
}

fn arb_failure_event() -> impl Strategy<Value = Event> {
    (arb_request_id(), "[a-zA-Z ]{1,30}")
        .prop_map(|(request_id, message)| Event::ModelFailed {
            request_id,
            message,
        })
}

fn arb_completion_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_reply_event(), arb_failure_event()]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_submit_event(), arb_completion_event()]
}

// ============================================================================
// Invariant Helpers
// ============================================================================

fn is_valid_session(session: &Session) -> bool {
    let messages = session.state.messages();
    let shape_ok = match &session.state {
        ConversationState::Initial => true,
        ConversationState::Active { pending: true, .. } | ConversationState::Error { .. } => {
            messages.len() == 1 && messages[0].author() == Author::User
        }
        ConversationState::Active { pending: false, .. } => {
            messages.len() == 2
                && messages[0].author() == Author::User
                && messages[1].author() == Author::Model
                && !messages[1].text().is_empty()
        }
    };
    // A request is in flight exactly while the state is pending
    shape_ok && session.in_flight.is_some() == session.state.is_pending()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Valid session after any sequence of events
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut session = Session::default();

        for event in events {
            if let Ok(result) = transition(&session, event) {
                session = result.new_session;
                prop_assert!(is_valid_session(&session), "Invalid session: {:?}", session);
            }
        }
    }

    // Invariant 2: Completions that don't match the in-flight request change nothing
    #[test]
    fn prop_stale_completions_ignored(
        submitted in arb_submit_event(),
        completion in arb_completion_event(),
    ) {
        let session = transition(&Session::default(), submitted).unwrap().new_session;
        prop_assume!(session.in_flight != Some(completion.request_id()));

        let result = transition(&session, completion).unwrap();
        prop_assert_eq!(result.new_session, session);
        prop_assert!(result.effects.is_empty());
    }

    // Invariant 3: A question always resets history to exactly that question
    #[test]
    fn prop_submit_resets_history(
        events in proptest::collection::vec(arb_event(), 0..10),
        question in arb_question(),
        id in arb_request_id(),
    ) {
        let mut session = Session::default();
        for event in events {
            if let Ok(result) = transition(&session, event) {
                session = result.new_session;
            }
        }

        let result = transition(&session, Event::QuestionSubmitted {
            request_id: id,
            text: question.clone(),
            prompt: question.clone(),
        }).unwrap();

        prop_assert_eq!(result.new_session.state.messages(), &[Message::user(question)][..]);
        prop_assert!(result.new_session.state.is_pending());
        prop_assert_eq!(result.new_session.in_flight, Some(id));
    }

    // Invariant 4: Every state change is published
    #[test]
    fn prop_state_changes_publish(
        events in proptest::collection::vec(arb_event(), 0..20),
    ) {
        let mut session = Session::default();
        for event in events {
            if let Ok(result) = transition(&session, event) {
                if result.new_session.state != session.state {
                    prop_assert!(
                        result.effects.contains(&Effect::Publish),
                        "State changed without publish: {:?}",
                        result.new_session
                    );
                }
                session = result.new_session;
            }
        }
    }

    // Invariant 5: At most one generation is requested per transition,
    // and only alongside a pending state
    #[test]
    fn prop_single_generation_in_flight(state_events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut session = Session::default();
        for event in state_events {
            if let Ok(result) = transition(&session, event) {
                let requests = result
                    .effects
                    .iter()
                    .filter(|e| matches!(e, Effect::RequestGeneration { .. }))
                    .count();
                prop_assert!(requests <= 1);
                if requests == 1 {
                    prop_assert!(result.new_session.state.is_pending());
                }
                session = result.new_session;
            }
        }
    }
}
