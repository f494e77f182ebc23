//! Effects produced by state transitions

use super::state::RequestId;

/// Effects to be executed by the store after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Push the new state to observers
    Publish,

    /// Ask the model client for a reply
    RequestGeneration { request_id: RequestId, prompt: String },

    /// Abandon a generation that a newer question superseded
    CancelGeneration { request_id: RequestId },
}
