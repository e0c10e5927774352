//! Ticket records and the storage adapter used by the analysis pipeline.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteTicketStore;
pub use store::{StoreError, TicketStore};
pub use types::{
    AnalysisRun, AnalyzedTicket, LatestAnalysis, NewTicket, Ticket, TicketAnalysisRecord,
};
