use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("analyst.db")
}

/// Classifier configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Which classifier backend to use
    pub backend: ClassifierBackend,
    /// LLM settings (required when backend = "llm")
    #[serde(default)]
    pub llm: Option<LlmConfig>,
}

/// Available classifier backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierBackend {
    /// Schema-constrained LLM classification
    Llm,
    /// Offline keyword matching, no credentials needed
    Keyword,
}

/// LLM provider selection
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Anthropic,
    Ollama,
}

/// LLM backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Model name (e.g. "claude-3-haiku-20240307", "llama3")
    pub model: String,
    /// API key (required for anthropic)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Override the provider's API base URL
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub classifier: SanitizedClassifierConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedClassifierConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<SanitizedLlmConfig>,
}

/// Sanitized LLM config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            classifier: SanitizedClassifierConfig {
                backend: match config.classifier.backend {
                    ClassifierBackend::Llm => "llm".to_string(),
                    ClassifierBackend::Keyword => "keyword".to_string(),
                },
                llm: config.classifier.llm.as_ref().map(|l| SanitizedLlmConfig {
                    provider: match l.provider {
                        LlmProvider::Anthropic => "anthropic".to_string(),
                        LlmProvider::Ollama => "ollama".to_string(),
                    },
                    model: l.model.clone(),
                    api_key_configured: l.api_key.as_deref().is_some_and(|k| !k.is_empty()),
                }),
            },
            server: config.server.clone(),
            database: config.database.clone(),
        }
    }
}
