//! Conversation store
//!
//! Owns the conversation session, drives the state machine and publishes
//! every state change through a watch channel. Model calls run on spawned
//! Tokio tasks; a newer question cancels the older call and any completion
//! that slips through anyway is dropped by the transition function.

pub mod traits;

#[cfg(test)]
pub mod testing;

pub use traits::*;

use crate::conversation::{
    transition, ConversationState, Effect, Event, RequestId, Session, TransitionError,
};
use crate::persona::Persona;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

/// Reasons a question is not accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error("No Tokio runtime to run the model call on")]
    NoRuntime,
}

/// Handle to a conversation. Cloning shares the same conversation.
pub struct ConversationStore<C: ModelClient + 'static> {
    inner: Arc<Inner<C>>,
}

impl<C: ModelClient + 'static> Clone for ConversationStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<C> {
    client: C,
    persona: Persona,
    machine: Mutex<Machine>,
    state_tx: watch::Sender<ConversationState>,
}

/// Mutable part of the store, only touched under the lock
#[derive(Default)]
struct Machine {
    session: Session,
    last_request_id: RequestId,
    /// Cancellation handle for the generation currently in flight
    generation: Option<(RequestId, CancellationToken)>,
}

impl<C: ModelClient + 'static> ConversationStore<C> {
    pub fn new(client: C, persona: Persona) -> Self {
        let (state_tx, _) = watch::channel(ConversationState::Initial);
        Self {
            inner: Arc::new(Inner {
                client,
                persona,
                machine: Mutex::new(Machine::default()),
                state_tx,
            }),
        }
    }

    /// Ask a new question.
    ///
    /// The pending state is published before this returns; the model call
    /// runs in the background on the current Tokio runtime. Without one the
    /// question is refused and the state is left alone.
    pub fn submit_question(&self, text: &str) -> Result<RequestId, SubmitError> {
        if Handle::try_current().is_err() {
            return Err(SubmitError::NoRuntime);
        }

        let prompt = self.inner.persona.wrap(text);
        let mut machine = self.lock();
        let request_id = machine.last_request_id.next();

        self.apply(
            &mut machine,
            Event::QuestionSubmitted {
                request_id,
                text: text.to_string(),
                prompt,
            },
        )?;
        machine.last_request_id = request_id;

        tracing::info!(request_id = %request_id, "Question submitted");
        Ok(request_id)
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> ConversationState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state_tx.borrow().is_pending()
    }

    /// Receiver that observes every published state
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.inner.state_tx.subscribe()
    }

    /// Published states as a stream, starting with the current one
    pub fn updates(&self) -> WatchStream<ConversationState> {
        WatchStream::new(self.subscribe())
    }

    /// Wait until no request is pending and return that state
    pub async fn settled(&self) -> ConversationState {
        let mut updates = self.updates();
        while let Some(state) = updates.next().await {
            if !state.is_pending() {
                return state;
            }
        }
        // The sender lives as long as `self`, so the stream can't end first
        self.current_state()
    }

    fn lock(&self) -> MutexGuard<'_, Machine> {
        self.inner
            .machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, machine: &mut Machine, event: Event) -> Result<(), TransitionError> {
        let result = transition(&machine.session, event)?;
        machine.session = result.new_session;

        for effect in result.effects {
            self.execute_effect(machine, effect);
        }
        Ok(())
    }

    fn execute_effect(&self, machine: &mut Machine, effect: Effect) {
        match effect {
            Effect::Publish => {
                tracing::debug!(state = machine.session.state.name(), "Publishing state");
                self.inner
                    .state_tx
                    .send_replace(machine.session.state.clone());
            }
            Effect::CancelGeneration { request_id } => {
                if let Some((id, token)) = machine.generation.take() {
                    if id == request_id {
                        tracing::debug!(request_id = %id, "Cancelling superseded generation");
                        token.cancel();
                    } else {
                        machine.generation = Some((id, token));
                    }
                }
            }
            Effect::RequestGeneration { request_id, prompt } => {
                let token = CancellationToken::new();
                machine.generation = Some((request_id, token.clone()));
                self.spawn_generation(request_id, prompt, token);
            }
        }
    }

    fn spawn_generation(&self, request_id: RequestId, prompt: String, token: CancellationToken) {
        let store = self.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(request_id = %request_id, "Generation cancelled");
                    return;
                }
                outcome = store.inner.client.generate(&prompt) => outcome,
            };

            let event = match outcome {
                Ok(text) => Event::ModelReplied { request_id, text },
                Err(e) => {
                    tracing::warn!(request_id = %request_id, error = %e, "Generation failed");
                    Event::ModelFailed {
                        request_id,
                        message: e.to_string(),
                    }
                }
            };
            store.complete(event);
        });
    }

    fn complete(&self, event: Event) {
        let request_id = event.request_id();
        let mut machine = self.lock();
        if matches!(machine.generation, Some((id, _)) if id == request_id) {
            machine.generation = None;
        }

        match self.apply(&mut machine, event) {
            Ok(()) if machine.session.in_flight.is_some() => {
                tracing::debug!(request_id = %request_id, "Dropped stale completion");
            }
            Ok(()) => {
                tracing::info!(
                    request_id = %request_id,
                    state = machine.session.state.name(),
                    "Conversation updated"
                );
            }
            Err(e) => {
                tracing::debug!(request_id = %request_id, error = %e, "Dropped completion");
            }
        }
    }
}
