//! Ticket API handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use analyst_core::{NewTicket, Ticket};

use crate::state::AppState;

/// Maximum number of tickets accepted in a single create request
const MAX_BATCH_SIZE: usize = 500;

// ============================================================================
// Request/Response Types
// ============================================================================

/// One ticket in a create request
#[derive(Debug, Deserialize)]
pub struct TicketBody {
    pub title: String,
    pub description: String,
}

/// Request body for creating tickets
#[derive(Debug, Deserialize)]
pub struct CreateTicketsBody {
    pub tickets: Vec<TicketBody>,
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListTicketsParams {
    /// Comma-separated ticket ids to restrict the listing
    pub ids: Option<String>,
}

/// Response for ticket operations
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: String,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            created_at: ticket.created_at.to_rfc3339(),
        }
    }
}

/// Response for listing tickets
#[derive(Debug, Serialize)]
pub struct ListTicketsResponse {
    pub tickets: Vec<TicketResponse>,
    pub total: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct TicketErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a batch of tickets
pub async fn create_tickets(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTicketsBody>,
) -> Result<(StatusCode, Json<ListTicketsResponse>), impl IntoResponse> {
    if body.tickets.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(TicketErrorResponse {
                error: "tickets must not be empty".to_string(),
            }),
        ));
    }
    if body.tickets.len() > MAX_BATCH_SIZE {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(TicketErrorResponse {
                error: format!("at most {} tickets per request", MAX_BATCH_SIZE),
            }),
        ));
    }
    if body.tickets.iter().any(|t| t.title.trim().is_empty()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(TicketErrorResponse {
                error: "ticket title must not be empty".to_string(),
            }),
        ));
    }

    let requests: Vec<NewTicket> = body
        .tickets
        .into_iter()
        .map(|t| NewTicket::new(t.title, t.description))
        .collect();

    match state.ticket_store().create_tickets(requests) {
        Ok(tickets) => {
            let total = tickets.len();
            Ok((
                StatusCode::CREATED,
                Json(ListTicketsResponse {
                    tickets: tickets.into_iter().map(TicketResponse::from).collect(),
                    total,
                }),
            ))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(TicketErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// List tickets, optionally restricted to a set of ids
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTicketsParams>,
) -> Result<Json<ListTicketsResponse>, impl IntoResponse> {
    let ids = match parse_ids(params.ids.as_deref()) {
        Ok(ids) => ids,
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(TicketErrorResponse { error: e }),
            ));
        }
    };

    match state.ticket_store().list_tickets(ids.as_deref()) {
        Ok(tickets) => {
            let total = tickets.len();
            Ok(Json(ListTicketsResponse {
                tickets: tickets.into_iter().map(TicketResponse::from).collect(),
                total,
            }))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(TicketErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// Parse a comma-separated id list. `None` means no filter.
fn parse_ids(raw: Option<&str>) -> Result<Option<Vec<i64>>, String> {
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let mut ids = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = part
            .parse::<i64>()
            .map_err(|_| format!("invalid ticket id: {}", part))?;
        ids.push(id);
    }
    Ok(Some(ids))
}
