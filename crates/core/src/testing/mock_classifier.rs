//! Mock classifier for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::classifier::{
    Category, Classification, ClassificationError, Priority, TicketClassifier,
};

/// Mock implementation of [`TicketClassifier`].
///
/// Behaviors are queued in call order with [`push_ok`](Self::push_ok) and
/// [`push_err`](Self::push_err); classified titles are recorded for
/// assertions. An empty queue fails the call, so tests notice unexpected
/// classifications.
pub struct MockClassifier {
    queue: Mutex<VecDeque<Result<Classification, String>>>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful classification.
    pub fn push_ok(&self, category: Category, priority: Priority, reasoning: &str) {
        self.queue.lock().unwrap().push_back(Ok(Classification {
            category,
            priority,
            reasoning: reasoning.to_string(),
        }));
    }

    /// Queue a failure.
    pub fn push_err(&self, message: &str) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Titles of the tickets classified so far, in call order.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketClassifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn classify(
        &self,
        title: &str,
        _description: &str,
    ) -> Result<Classification, ClassificationError> {
        self.calls.lock().unwrap().push(title.to_string());

        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(Ok(classification)) => Ok(classification),
            Some(Err(message)) => Err(ClassificationError::MalformedResponse(message)),
            None => Err(ClassificationError::MalformedResponse(
                "mock queue exhausted".to_string(),
            )),
        }
    }
}
