use std::sync::Arc;

use analyst_core::{AnalysisOrchestrator, Config, SanitizedConfig, TicketStore};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<dyn TicketStore>,
    orchestrator: AnalysisOrchestrator,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn TicketStore>, orchestrator: AnalysisOrchestrator) -> Self {
        Self {
            config,
            store,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn ticket_store(&self) -> &dyn TicketStore {
        self.store.as_ref()
    }

    pub fn orchestrator(&self) -> &AnalysisOrchestrator {
        &self.orchestrator
    }
}
