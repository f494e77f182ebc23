//! Pure state transition function

use super::state::{ConversationState, Message, RequestId, Session};
use super::{Effect, Event};
use thiserror::Error;

/// Shown in place of an empty model reply
pub const FALLBACK_REPLY: &str = "Sorry, I don't know what to say";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Question is empty")]
    EmptyQuestion,
    #[error("No request in flight for {0}")]
    NoRequestInFlight(RequestId),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
/// Completions for anything other than the in-flight request leave the
/// session untouched.
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::QuestionSubmitted {
            request_id,
            text,
            prompt,
        } => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyQuestion);
            }

            // History is reset on every question
            let next = Session {
                state: ConversationState::Active {
                    messages: vec![Message::user(text)],
                    pending: true,
                },
                in_flight: Some(request_id),
            };

            let mut result = TransitionResult::new(next);
            if let Some(superseded) = session.in_flight {
                result = result.with_effect(Effect::CancelGeneration {
                    request_id: superseded,
                });
            }
            Ok(result
                .with_effect(Effect::Publish)
                .with_effect(Effect::RequestGeneration { request_id, prompt }))
        }

        Event::ModelReplied { request_id, text } => match session.in_flight {
            Some(current) if current == request_id => {
                let reply = if text.is_empty() {
                    FALLBACK_REPLY.to_string()
                } else {
                    text
                };
                let mut messages = session.state.messages().to_vec();
                messages.push(Message::model(reply));

                Ok(TransitionResult::new(Session {
                    state: ConversationState::Active {
                        messages,
                        pending: false,
                    },
                    in_flight: None,
                })
                .with_effect(Effect::Publish))
            }
            Some(_) => Ok(TransitionResult::new(session.clone())),
            None => Err(TransitionError::NoRequestInFlight(request_id)),
        },

        Event::ModelFailed {
            request_id,
            message,
        } => match session.in_flight {
            Some(current) if current == request_id => Ok(TransitionResult::new(Session {
                state: ConversationState::Error {
                    last_messages: session.state.messages().to_vec(),
                    error_text: message,
                },
                in_flight: None,
            })
            .with_effect(Effect::Publish)),
            Some(_) => Ok(TransitionResult::new(session.clone())),
            None => Err(TransitionError::NoRequestInFlight(request_id)),
        },
    }
}
