use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use analyst_core::{
    load_config, validate_config, AnalysisOrchestrator, AnthropicClient, ClassifierBackend,
    KeywordClassifier, LlmClassifier, LlmConfig, LlmProvider, OllamaClient, SqliteTicketStore,
    TicketClassifier, TicketStore,
};

use analyst_server::api::create_router;
use analyst_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ANALYST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Classifier backend: {:?}", config.classifier.backend);
    info!("Database path: {:?}", config.database.path);

    // Create SQLite ticket store
    let store: Arc<dyn TicketStore> = Arc::new(
        SqliteTicketStore::new(&config.database.path).context("Failed to create ticket store")?,
    );
    info!("Ticket store initialized");

    // Create classifier per configured backend
    let classifier: Arc<dyn TicketClassifier> = match config.classifier.backend {
        ClassifierBackend::Keyword => {
            info!("Using keyword classifier");
            Arc::new(KeywordClassifier::new())
        }
        ClassifierBackend::Llm => {
            let llm = config
                .classifier
                .llm
                .as_ref()
                .context("LLM backend selected but no [classifier.llm] config provided")?;
            build_llm_classifier(llm)?
        }
    };

    // Create the analysis orchestrator
    let orchestrator = AnalysisOrchestrator::new(Arc::clone(&store), classifier);

    // Create app state
    let app_state = Arc::new(AppState::new(config.clone(), store, orchestrator));

    // Create router
    let app = create_router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

fn build_llm_classifier(llm: &LlmConfig) -> Result<Arc<dyn TicketClassifier>> {
    match llm.provider {
        LlmProvider::Anthropic => {
            let api_key = match llm.api_key.as_deref() {
                Some(key) if !key.is_empty() => key,
                _ => bail!("Anthropic provider requires classifier.llm.api_key"),
            };
            info!("Using Anthropic classifier (model: {})", llm.model);
            let mut client = AnthropicClient::new(api_key, &llm.model);
            if let Some(ref base) = llm.api_base {
                client = client.with_api_base(base);
            }
            Ok(Arc::new(LlmClassifier::new(Arc::new(client))))
        }
        LlmProvider::Ollama => {
            info!("Using Ollama classifier (model: {})", llm.model);
            let mut client = OllamaClient::new(&llm.model);
            if let Some(ref base) = llm.api_base {
                client = client.with_api_base(base);
            }
            Ok(Arc::new(LlmClassifier::new(Arc::new(client))))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
