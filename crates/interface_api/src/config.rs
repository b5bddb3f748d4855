//! API configuration

use serde::Deserialize;
use std::time::Duration;

/// API configuration
///
/// Every field can be overridden by an `API_`-prefixed environment variable
/// (`API_PORT`, `API_LLM_API_KEY`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// SQLite URL of the policy store
    pub database_url: String,
    /// Seed file loaded into an empty store at startup
    pub policy_seed_path: Option<String>,
    /// Log level
    pub log_level: String,
    /// Key for the chat completion endpoint; the model-backed path is off without it
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: infra_db::DEFAULT_DATABASE_URL.to_string(),
            policy_seed_path: Some("data/policies/ai_logistics_policies.json".to_string()),
            log_level: "info".to_string(),
            llm_api_key: None,
            llm_base_url: domain_policy::adapters::openai::DEFAULT_BASE_URL.to_string(),
            llm_model: domain_policy::adapters::openai::DEFAULT_MODEL.to_string(),
            llm_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment, falling back to defaults per field
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The API key, when one is configured and non-blank
    pub fn llm_key(&self) -> Option<&str> {
        self.llm_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.database_url, "sqlite://data/policies.db");
        assert!(config.llm_key().is_none());
    }

    #[test]
    fn test_blank_llm_key_is_disabled() {
        let config = ApiConfig {
            llm_api_key: Some("  ".to_string()),
            ..ApiConfig::default()
        };
        assert!(config.llm_key().is_none());
    }
}
