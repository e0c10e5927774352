//! Types for the analysis pipeline.
//!
//! Each stage consumes the previous stage's value and produces the next one;
//! there is no long-lived mutable run state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::ClassificationError;
use crate::ticket::{StoreError, Ticket, TicketAnalysisRecord};

/// The three sequential pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetch,
    Classify,
    Persist,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Classify => "classify",
            Stage::Persist => "persist",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a pipeline run, attributed to the failing stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The store could not be reached while fetching tickets.
    #[error("fetch stage failed: {0}")]
    Fetch(#[source] StoreError),

    /// Every ticket in scope failed classification.
    #[error("classify stage failed: all {attempted} ticket(s) failed; first error: {source}")]
    Classify {
        attempted: usize,
        #[source]
        source: ClassificationError,
    },

    /// The run row and analysis rows could not be written.
    #[error("persist stage failed: {0}")]
    Persist(#[source] StoreError),
}

impl PipelineError {
    /// The stage this error occurred in.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch(_) => Stage::Fetch,
            PipelineError::Classify { .. } => Stage::Classify,
            PipelineError::Persist(_) => Stage::Persist,
        }
    }
}

/// Output of the fetch stage: the ticket set in scope, in fetch order.
#[derive(Debug, Clone)]
pub struct FetchedRun {
    pub tickets: Vec<Ticket>,
}

/// One ticket that could not be classified, kept for reporting.
#[derive(Debug, Clone)]
pub struct ClassificationFailure {
    pub ticket_id: i64,
    pub title: String,
    pub error: String,
}

/// Output of the classify stage: per-ticket records in fetch order, the
/// tolerated failures, and the deterministic run summary.
#[derive(Debug, Clone)]
pub struct ClassifiedRun {
    pub analyses: Vec<TicketAnalysisRecord>,
    pub failures: Vec<ClassificationFailure>,
    pub summary: String,
}

/// Final result returned to the orchestration caller.
///
/// `run_id` is `None` for a no-op run over zero tickets, which writes no
/// run record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Option<i64>,
    pub summary: String,
    pub ticket_count: usize,
}
