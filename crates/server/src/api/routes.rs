use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{analysis, handlers, tickets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Tickets
        .route("/tickets", post(tickets::create_tickets))
        .route("/tickets", get(tickets::list_tickets))
        // Analysis
        .route("/analysis/run", post(analysis::run_analysis))
        .route("/analysis/latest", get(analysis::latest_analysis))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
