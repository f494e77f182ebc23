//! Mock model clients for testing
//!
//! These mocks enable store tests without real I/O.

use super::traits::ModelClient;
use crate::llm::LlmError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

// ============================================================================
// Mock Model Client
// ============================================================================

/// Mock client that returns queued replies in call order
pub struct MockModelClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Record of every prompt received
    pub prompts: Mutex<Vec<String>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock reply queued")))
    }
}

// ============================================================================
// Gated Model Client (for ordering and cancellation tests)
// ============================================================================

/// Mock client whose calls block until the test releases them.
///
/// Gates are keyed by prompt, so tests control completion order regardless
/// of which spawned task starts first.
pub struct GatedModelClient {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<String, LlmError>>>>,
}

impl GatedModelClient {
    pub fn new() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Register a gate for `prompt`; send on the returned sender to release it
    pub fn gate(&self, prompt: impl Into<String>) -> oneshot::Sender<Result<String, LlmError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(prompt.into(), rx);
        tx
    }
}

#[async_trait]
impl ModelClient for GatedModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let gate = self.gates.lock().unwrap().remove(prompt);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(LlmError::network("Gate dropped"))),
            None => Err(LlmError::network(format!("No gate for prompt {prompt:?}"))),
        }
    }
}
