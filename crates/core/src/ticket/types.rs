//! Ticket and analysis record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{Category, Priority};

/// A single customer support request.
///
/// Immutable once created; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a ticket (id and timestamp assigned by the store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
}

impl NewTicket {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// One complete, timestamped execution of the analysis pipeline.
///
/// Append-only: a run is never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub summary: String,
}

/// Classification result to be written for one ticket in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketAnalysisRecord {
    pub ticket_id: i64,
    pub category: Category,
    pub priority: Priority,
    pub notes: String,
}

/// A stored ticket analysis row, joined with its originating ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedTicket {
    pub ticket_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    pub priority: Priority,
    pub notes: String,
}

/// The most recent analysis run with all its ticket results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestAnalysis {
    pub run: AnalysisRun,
    pub tickets: Vec<AnalyzedTicket>,
}
