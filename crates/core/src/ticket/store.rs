//! Ticket storage trait and errors.

use super::{AnalysisRun, LatestAnalysis, NewTicket, Ticket, TicketAnalysisRecord};

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing database could not be reached or rejected the operation.
    #[error("database error: {0}")]
    Database(String),

    /// A referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Trait for ticket and analysis storage backends.
///
/// The analysis pipeline depends only on these signatures, never on the
/// storage engine behind them.
pub trait TicketStore: Send + Sync {
    /// Insert a batch of tickets and return them with store-assigned ids,
    /// in input order.
    fn create_tickets(&self, tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, StoreError>;

    /// List tickets, ordered by id ascending.
    ///
    /// With a filter, returns only the tickets whose id appears in it;
    /// ids that do not exist are silently absent from the result.
    fn list_tickets(&self, ids: Option<&[i64]>) -> Result<Vec<Ticket>, StoreError>;

    /// Create a new analysis run row.
    fn create_run(&self, summary: &str) -> Result<AnalysisRun, StoreError>;

    /// Insert one analysis row per record for an existing run.
    fn bulk_insert_analysis(
        &self,
        run_id: i64,
        analyses: &[TicketAnalysisRecord],
    ) -> Result<(), StoreError>;

    /// Create a run and insert all its analysis rows atomically.
    ///
    /// Either the run row and every analysis row land, or none do. This is
    /// the operation the persist stage uses.
    fn persist_run(
        &self,
        summary: &str,
        analyses: &[TicketAnalysisRecord],
    ) -> Result<AnalysisRun, StoreError>;

    /// The most recent run with its joined ticket/classification rows, or
    /// `None` if no runs exist. Rows are ordered as they were classified.
    fn get_latest_run(&self) -> Result<Option<LatestAnalysis>, StoreError>;
}
