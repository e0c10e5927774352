use super::types::{ClassifierBackend, Config, LlmProvider};
use super::ConfigError;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - backend = "llm" requires a [classifier.llm] section
/// - The anthropic provider requires an API key
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.classifier.backend == ClassifierBackend::Llm {
        let Some(llm) = &config.classifier.llm else {
            return Err(ConfigError::ValidationError(
                "classifier.backend = \"llm\" requires a [classifier.llm] section".to_string(),
            ));
        };

        if llm.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "classifier.llm.model cannot be empty".to_string(),
            ));
        }

        if llm.provider == LlmProvider::Anthropic
            && llm.api_key.as_deref().unwrap_or("").is_empty()
        {
            return Err(ConfigError::ValidationError(
                "classifier.llm.api_key is required for the anthropic provider".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ClassifierConfig, DatabaseConfig, LlmConfig, ServerConfig,
    };
    use std::net::IpAddr;

    fn keyword_config() -> Config {
        Config {
            classifier: ClassifierConfig {
                backend: ClassifierBackend::Keyword,
                llm: None,
            },
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&keyword_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = keyword_config();
        config.server = ServerConfig {
            host: "0.0.0.0".parse::<IpAddr>().unwrap(),
            port: 0,
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_llm_backend_without_section_fails() {
        let mut config = keyword_config();
        config.classifier.backend = ClassifierBackend::Llm;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_anthropic_without_key_fails() {
        let mut config = keyword_config();
        config.classifier = ClassifierConfig {
            backend: ClassifierBackend::Llm,
            llm: Some(LlmConfig {
                provider: LlmProvider::Anthropic,
                model: "claude-3-haiku-20240307".to_string(),
                api_key: None,
                api_base: None,
            }),
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_ollama_without_key_ok() {
        let mut config = keyword_config();
        config.classifier = ClassifierConfig {
            backend: ClassifierBackend::Llm,
            llm: Some(LlmConfig {
                provider: LlmProvider::Ollama,
                model: "llama3".to_string(),
                api_key: None,
                api_base: None,
            }),
        };
        assert!(validate_config(&config).is_ok());
    }
}
