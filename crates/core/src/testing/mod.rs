//! Testing utilities and mock implementations.
//!
//! Used by the core's own pipeline tests and by the server's integration
//! tests to exercise runs without a real LLM provider.

mod failing_store;
mod mock_classifier;

pub use failing_store::FailingStore;
pub use mock_classifier::MockClassifier;
