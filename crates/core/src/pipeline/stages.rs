//! The three pipeline stages: fetch, classify, persist.
//!
//! Stages are free functions over staged values. Classification failures are
//! tolerated per ticket: the run proceeds with the successful subset and the
//! summary reports the skipped count, but a run in which every ticket fails
//! is an error.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::classifier::{Category, Priority, TicketClassifier};
use crate::ticket::{TicketAnalysisRecord, TicketStore};

use super::types::{
    ClassificationFailure, ClassifiedRun, FetchedRun, PipelineError, RunReport,
};

/// Fetch the ticket set in scope. An empty result is not a failure.
pub fn fetch(
    store: &dyn TicketStore,
    ticket_ids: Option<&[i64]>,
) -> Result<FetchedRun, PipelineError> {
    let tickets = store
        .list_tickets(ticket_ids)
        .map_err(PipelineError::Fetch)?;

    debug!(count = tickets.len(), filtered = ticket_ids.is_some(), "fetched tickets");
    Ok(FetchedRun { tickets })
}

/// Classify each fetched ticket in fetch order, one call per ticket.
pub async fn classify(
    classifier: &dyn TicketClassifier,
    fetched: FetchedRun,
) -> Result<ClassifiedRun, PipelineError> {
    let ticket_count = fetched.tickets.len();
    let mut analyses = Vec::with_capacity(ticket_count);
    let mut failures = Vec::new();
    let mut first_error = None;

    for ticket in &fetched.tickets {
        match classifier.classify(&ticket.title, &ticket.description).await {
            Ok(classification) => {
                analyses.push(TicketAnalysisRecord {
                    ticket_id: ticket.id,
                    category: classification.category,
                    priority: classification.priority,
                    notes: classification.reasoning,
                });
            }
            Err(e) => {
                warn!(ticket_id = ticket.id, error = %e, "ticket classification failed");
                failures.push(ClassificationFailure {
                    ticket_id: ticket.id,
                    title: ticket.title.clone(),
                    error: e.to_string(),
                });
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(source) = first_error {
        if analyses.is_empty() {
            return Err(PipelineError::Classify {
                attempted: ticket_count,
                source,
            });
        }
    }

    let summary = build_summary(&analyses, failures.len());
    Ok(ClassifiedRun {
        analyses,
        failures,
        summary,
    })
}

/// Persist the run and its analysis rows atomically. A run over zero tickets
/// writes nothing and reports `run_id = None`.
pub fn persist(
    store: &dyn TicketStore,
    classified: ClassifiedRun,
) -> Result<RunReport, PipelineError> {
    if classified.analyses.is_empty() {
        return Ok(RunReport {
            run_id: None,
            summary: classified.summary,
            ticket_count: 0,
        });
    }

    let run = store
        .persist_run(&classified.summary, &classified.analyses)
        .map_err(PipelineError::Persist)?;

    Ok(RunReport {
        run_id: Some(run.id),
        summary: classified.summary,
        ticket_count: classified.analyses.len(),
    })
}

/// Deterministic summary text from the classification counts.
///
/// Priorities are always listed in full; categories list the non-zero counts
/// in fixed enum order.
pub fn build_summary(analyses: &[TicketAnalysisRecord], skipped: usize) -> String {
    if analyses.is_empty() {
        return "Analyzed 0 ticket(s). No tickets matched the requested scope.".to_string();
    }

    let mut priority_counts: HashMap<Priority, usize> = HashMap::new();
    let mut category_counts: HashMap<Category, usize> = HashMap::new();
    for analysis in analyses {
        *priority_counts.entry(analysis.priority).or_default() += 1;
        *category_counts.entry(analysis.category).or_default() += 1;
    }

    let categories = Category::ALL
        .iter()
        .filter_map(|c| {
            category_counts
                .get(c)
                .map(|count| format!("{} {}", count, c))
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut summary = format!(
        "Analyzed {} ticket(s). Priority breakdown: {} high, {} medium, {} low. Category breakdown: {}.",
        analyses.len(),
        priority_counts.get(&Priority::High).copied().unwrap_or(0),
        priority_counts.get(&Priority::Medium).copied().unwrap_or(0),
        priority_counts.get(&Priority::Low).copied().unwrap_or(0),
        categories,
    );

    if skipped > 0 {
        summary.push_str(&format!(
            " Skipped {} ticket(s) that failed classification.",
            skipped
        ));
    }

    summary
}
