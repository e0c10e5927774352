pub mod classifier;
pub mod config;
pub mod pipeline;
pub mod testing;
pub mod ticket;

pub use classifier::{
    AnthropicClient, Category, Classification, ClassificationError, KeywordClassifier,
    LlmClassifier, LlmClient, OllamaClient, Priority, TicketClassifier,
};
pub use config::{
    load_config, load_config_from_str, validate_config, ClassifierBackend, ClassifierConfig,
    Config, ConfigError, DatabaseConfig, LlmConfig, LlmProvider, SanitizedConfig, ServerConfig,
};
pub use pipeline::{AnalysisOrchestrator, PipelineError, RunReport, Stage};
pub use ticket::{
    AnalysisRun, AnalyzedTicket, LatestAnalysis, NewTicket, SqliteTicketStore, StoreError, Ticket,
    TicketAnalysisRecord, TicketStore,
};
