//! Trait abstractions for store I/O
//!
//! The store only needs one async call; mocks implement it in tests.

use crate::llm::{GenerationConfig, LlmError, LlmRequest, LlmService};
use async_trait::async_trait;
use std::sync::Arc;

/// Client that turns a prompt into generated text
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate a reply. An empty string means the model had nothing to say.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter to use any `LlmService` as a `ModelClient`
pub struct ServiceModelClient {
    service: Arc<dyn LlmService>,
    generation: GenerationConfig,
}

impl ServiceModelClient {
    pub fn new(service: Arc<dyn LlmService>, generation: GenerationConfig) -> Self {
        Self {
            service,
            generation,
        }
    }
}

#[async_trait]
impl ModelClient for ServiceModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .service
            .complete(&LlmRequest::new(prompt, self.generation.clone()))
            .await?;
        Ok(response.text)
    }
}
