//! Ticket classification: the closed output enums, the classifier trait, and
//! its LLM and keyword implementations.

mod keyword_classifier;
mod llm;
mod llm_classifier;
mod types;

pub use keyword_classifier::KeywordClassifier;
pub use llm::{
    AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, OllamaClient,
    TokenUsage,
};
pub use llm_classifier::LlmClassifier;
pub use types::{Category, Classification, Priority};

use async_trait::async_trait;

/// Error type for a single classification attempt.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// Transport or provider failure on the outbound call.
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    /// The response body was not the expected JSON object, or carried values
    /// outside the category/priority enumerations.
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),
}

/// Trait for ticket classifiers.
///
/// One attempt per call, explicit failure; retries are the caller's concern.
#[async_trait]
pub trait TicketClassifier: Send + Sync {
    /// Implementation name, for logging.
    fn name(&self) -> &str;

    /// Classify one ticket from its title and description.
    async fn classify(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Classification, ClassificationError>;
}
