//! The run orchestrator: drives one analysis run through the pipeline.

use std::sync::Arc;

use tracing::{info, warn};

use crate::classifier::TicketClassifier;
use crate::ticket::TicketStore;

use super::stages;
use super::types::{PipelineError, RunReport};

/// Entry point for the analysis pipeline.
///
/// Holds its collaborators explicitly; one `run_analysis` call is one
/// complete, synchronous fetch → classify → persist sequence. Runs are
/// independent units of work and concurrent calls need no coordination
/// beyond the store's own.
pub struct AnalysisOrchestrator {
    store: Arc<dyn TicketStore>,
    classifier: Arc<dyn TicketClassifier>,
}

impl AnalysisOrchestrator {
    pub fn new(store: Arc<dyn TicketStore>, classifier: Arc<dyn TicketClassifier>) -> Self {
        Self { store, classifier }
    }

    /// Run one analysis over the given ticket ids, or over every ticket in
    /// the store when no filter is given.
    pub async fn run_analysis(
        &self,
        ticket_ids: Option<Vec<i64>>,
    ) -> Result<RunReport, PipelineError> {
        info!(
            classifier = self.classifier.name(),
            filtered = ticket_ids.is_some(),
            "starting analysis run"
        );

        let fetched = stages::fetch(self.store.as_ref(), ticket_ids.as_deref())?;
        let classified = stages::classify(self.classifier.as_ref(), fetched).await?;

        if !classified.failures.is_empty() {
            warn!(
                skipped = classified.failures.len(),
                "run proceeding without tickets that failed classification"
            );
        }

        let report = stages::persist(self.store.as_ref(), classified)?;

        info!(
            run_id = report.run_id,
            ticket_count = report.ticket_count,
            "analysis run complete"
        );

        Ok(report)
    }
}
