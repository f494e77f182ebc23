//! Common types for LLM interactions

/// LLM request: one user prompt, no history
#[derive(Debug, Clone, Default)]
pub struct LlmRequest {
    pub prompt: String,
    pub generation: GenerationConfig,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>, generation: GenerationConfig) -> Self {
        Self {
            prompt: prompt.into(),
            generation,
        }
    }
}

/// Sampling parameters; `None` leaves the provider default in place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    pub fn is_default(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

/// LLM response
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Concatenated text parts; empty when the model produced no text
    pub text: String,
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
