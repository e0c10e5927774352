//! Analysis API handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use analyst_core::{AnalyzedTicket, LatestAnalysis, PipelineError, RunReport, Stage};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for triggering an analysis run
#[derive(Debug, Default, Deserialize)]
pub struct RunAnalysisBody {
    /// Restrict the run to these ticket ids; absent means all tickets
    pub ticket_ids: Option<Vec<i64>>,
}

/// Response for a completed analysis run
#[derive(Debug, Serialize)]
pub struct RunReportResponse {
    pub run_id: Option<i64>,
    pub summary: String,
    pub ticket_count: usize,
}

impl From<RunReport> for RunReportResponse {
    fn from(report: RunReport) -> Self {
        Self {
            run_id: report.run_id,
            summary: report.summary,
            ticket_count: report.ticket_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzedTicketResponse {
    pub ticket_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub category: String,
    pub priority: String,
    pub notes: String,
}

impl From<AnalyzedTicket> for AnalyzedTicketResponse {
    fn from(t: AnalyzedTicket) -> Self {
        Self {
            ticket_id: t.ticket_id,
            title: t.title,
            description: t.description,
            created_at: t.created_at.to_rfc3339(),
            category: t.category.as_str().to_string(),
            priority: t.priority.as_str().to_string(),
            notes: t.notes,
        }
    }
}

/// Response for the latest analysis run
#[derive(Debug, Serialize)]
pub struct LatestAnalysisResponse {
    pub run_id: i64,
    pub created_at: String,
    pub summary: String,
    pub tickets: Vec<AnalyzedTicketResponse>,
}

impl From<LatestAnalysis> for LatestAnalysisResponse {
    fn from(latest: LatestAnalysis) -> Self {
        Self {
            run_id: latest.run.id,
            created_at: latest.run.created_at.to_rfc3339(),
            summary: latest.run.summary,
            tickets: latest
                .tickets
                .into_iter()
                .map(AnalyzedTicketResponse::from)
                .collect(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct AnalysisErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Execute the analysis pipeline and report the outcome
pub async fn run_analysis(
    State(state): State<Arc<AppState>>,
    body: Option<Json<RunAnalysisBody>>,
) -> Result<Json<RunReportResponse>, impl IntoResponse> {
    let ticket_ids = body.and_then(|b| b.0.ticket_ids);

    match state.orchestrator().run_analysis(ticket_ids).await {
        Ok(report) => Ok(Json(RunReportResponse::from(report))),
        Err(e) => {
            let status = match e.stage() {
                // Classification talks to an external model; surface that as a
                // gateway failure rather than a server bug.
                Stage::Classify => StatusCode::BAD_GATEWAY,
                Stage::Fetch | Stage::Persist => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(error_response(&e))))
        }
    }
}

/// Fetch the most recent analysis run with its per-ticket results
pub async fn latest_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LatestAnalysisResponse>, impl IntoResponse> {
    match state.ticket_store().get_latest_run() {
        Ok(Some(latest)) => Ok(Json(LatestAnalysisResponse::from(latest))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(AnalysisErrorResponse {
                error: "no analysis runs recorded yet".to_string(),
                stage: None,
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AnalysisErrorResponse {
                error: e.to_string(),
                stage: None,
            }),
        )),
    }
}

fn error_response(e: &PipelineError) -> AnalysisErrorResponse {
    AnalysisErrorResponse {
        error: e.to_string(),
        stage: Some(e.stage().as_str().to_string()),
    }
}
