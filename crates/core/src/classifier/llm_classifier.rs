//! LLM-backed ticket classifier.
//!
//! Sends one schema-constrained completion per ticket and decodes the JSON
//! response into the closed category/priority enums. The provider is asked
//! for strict JSON output, but the payload is still validated locally; an
//! off-enum value or malformed body is a [`ClassificationError`], never a
//! default.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::llm::{CompletionRequest, LlmClient};
use super::types::{Category, Classification, Priority};
use super::{ClassificationError, TicketClassifier};

const SYSTEM_PROMPT: &str = r#"You are a support ticket triage assistant. Classify the ticket you are given.

Categories:
- bug: something is broken or not working as documented
- billing: payments, charges, invoices, refunds, subscriptions
- feature_request: asking for new or changed functionality
- general: anything else

Priorities:
- high: outage, data loss, security issue, or the user is blocked
- medium: degraded but usable, or time-sensitive billing issues
- low: cosmetic issues, questions, nice-to-have requests

Respond with a single JSON object and nothing else:
{"category": "<bug|billing|feature_request|general>", "priority": "<high|medium|low>", "reasoning": "<one short sentence>"}"#;

/// Maximum tokens for the classification response; the payload is one small
/// JSON object.
const MAX_RESPONSE_TOKENS: u32 = 256;

/// Expected JSON payload from the model. The enum fields reject off-enum
/// values at decode time.
#[derive(Debug, Deserialize)]
struct ClassificationPayload {
    category: Category,
    priority: Priority,
    reasoning: String,
}

/// Classifier that delegates to an [`LlmClient`].
pub struct LlmClassifier<C: LlmClient> {
    client: Arc<C>,
}

impl<C: LlmClient> LlmClassifier<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    fn build_prompt(title: &str, description: &str) -> String {
        format!("Title: {}\nDescription: {}", title, description)
    }

    /// Pull the JSON object out of the completion text. Models occasionally
    /// wrap the object in prose or code fences despite the instructions.
    fn extract_json(text: &str) -> &str {
        match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => &text[start..=end],
            _ => text,
        }
    }

    fn decode(text: &str) -> Result<Classification, ClassificationError> {
        let payload: ClassificationPayload = serde_json::from_str(Self::extract_json(text))
            .map_err(|e| ClassificationError::MalformedResponse(format!("{}: {}", e, text)))?;

        Ok(Classification {
            category: payload.category,
            priority: payload.priority,
            reasoning: payload.reasoning,
        })
    }
}

#[async_trait]
impl<C: LlmClient + 'static> TicketClassifier for LlmClassifier<C> {
    fn name(&self) -> &str {
        "llm"
    }

    async fn classify(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Classification, ClassificationError> {
        let request = CompletionRequest::new(Self::build_prompt(title, description))
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(MAX_RESPONSE_TOKENS);

        let response = self.client.complete(request).await?;

        tracing::debug!(
            provider = self.client.provider(),
            model = self.client.model(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "classification completion finished"
        );

        Self::decode(&response.text)
    }
}
