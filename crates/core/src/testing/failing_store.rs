//! Store stub whose every operation fails, for unreachable-database tests.

use crate::ticket::{
    AnalysisRun, LatestAnalysis, NewTicket, StoreError, Ticket, TicketAnalysisRecord, TicketStore,
};

/// A [`TicketStore`] that fails every call with the configured message.
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Database(self.message.clone())
    }
}

impl TicketStore for FailingStore {
    fn create_tickets(&self, _tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, StoreError> {
        Err(self.error())
    }

    fn list_tickets(&self, _ids: Option<&[i64]>) -> Result<Vec<Ticket>, StoreError> {
        Err(self.error())
    }

    fn create_run(&self, _summary: &str) -> Result<AnalysisRun, StoreError> {
        Err(self.error())
    }

    fn bulk_insert_analysis(
        &self,
        _run_id: i64,
        _analyses: &[TicketAnalysisRecord],
    ) -> Result<(), StoreError> {
        Err(self.error())
    }

    fn persist_run(
        &self,
        _summary: &str,
        _analyses: &[TicketAnalysisRecord],
    ) -> Result<AnalysisRun, StoreError> {
        Err(self.error())
    }

    fn get_latest_run(&self) -> Result<Option<LatestAnalysis>, StoreError> {
        Err(self.error())
    }
}
