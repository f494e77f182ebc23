//! Events that can occur in a conversation

use super::state::RequestId;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    QuestionSubmitted {
        request_id: RequestId,
        text: String,
        /// Persona-wrapped text actually sent to the model
        prompt: String,
    },

    // Model events
    ModelReplied {
        request_id: RequestId,
        text: String,
    },
    ModelFailed {
        request_id: RequestId,
        message: String,
    },
}

impl Event {
    pub fn request_id(&self) -> RequestId {
        match self {
            Event::QuestionSubmitted { request_id, .. }
            | Event::ModelReplied { request_id, .. }
            | Event::ModelFailed { request_id, .. } => *request_id,
        }
    }
}
