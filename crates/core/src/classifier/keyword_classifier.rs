//! Keyword-based ticket classifier.
//!
//! Offline fallback for deployments without LLM credentials. Matches lowercase
//! substrings against fixed keyword tables; first matching category wins, in
//! table order. Defaults: category `general`, priority `medium`.

use async_trait::async_trait;

use super::types::{Category, Classification, Priority};
use super::{ClassificationError, TicketClassifier};

const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Billing,
        &["billing", "payment", "card", "charge", "invoice", "refund", "subscription"],
    ),
    (
        Category::Bug,
        &["bug", "crash", "error", "broken", "not working", "fails", "doesn't work"],
    ),
    (
        Category::FeatureRequest,
        &["feature", "request", "add", "want", "could you", "suggestion", "enhance"],
    ),
];

const PRIORITY_KEYWORDS: &[(Priority, &[&str])] = &[
    (
        Priority::High,
        &["urgent", "asap", "critical", "immediately", "production", "down", "outage"],
    ),
    (
        Priority::Low,
        &["minor", "eventually", "nice to have", "sometime", "when possible"],
    ),
];

/// Classifier driven by keyword matching; never fails.
#[derive(Debug, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn match_category(text: &str) -> Category {
        for (category, keywords) in CATEGORY_KEYWORDS {
            if keywords.iter().any(|k| text.contains(k)) {
                return *category;
            }
        }
        Category::General
    }

    fn match_priority(text: &str) -> Priority {
        for (priority, keywords) in PRIORITY_KEYWORDS {
            if keywords.iter().any(|k| text.contains(k)) {
                return *priority;
            }
        }
        Priority::Medium
    }
}

#[async_trait]
impl TicketClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Classification, ClassificationError> {
        let text = format!("{} {}", title, description).to_lowercase();

        let category = Self::match_category(&text);
        let priority = Self::match_priority(&text);

        Ok(Classification {
            category,
            priority,
            reasoning: format!(
                "Classified by keyword matching. Category: {}, Priority: {}.",
                category, priority
            ),
        })
    }
}
