//! Runtime configuration.
//!
//! Built once at startup and passed by reference. Sources, later ones win:
//! 1. Defaults
//! 2. Optional YAML file (durations in humantime format, e.g. `"90s"`)
//! 3. Environment variables

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::providers::secrets::{ApiCredential, CredentialSource};

pub const LLM_PROVIDER_ENV: &str = "LLM_PROVIDER";
pub const LLM_MODEL_ENV: &str = "LLM_MODEL";
pub const LLM_TIMEOUT_ENV: &str = "LLM_TIMEOUT";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const OLLAMA_BASE_URL_ENV: &str = "OLLAMA_BASE_URL";
pub const WEBHOOK_URL_ENV: &str = "N8N_WEBHOOK_URL";
pub const API_HOST_ENV: &str = "API_HOST";
pub const API_PORT_ENV: &str = "API_PORT";

/// Errors while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid duration in {var}: '{value}'")]
    InvalidDuration { var: String, value: String },

    #[error("Invalid port: '{0}'")]
    InvalidPort(String),
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
}

/// Model consultation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "stub", "ollama" or "openai"
    pub provider: String,

    pub model: String,

    /// Overall deadline for one consultation, fallback endpoint included
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    pub ollama_base_url: String,

    #[serde(with = "humantime_duration")]
    pub ollama_timeout: Duration,

    pub openai_base_url: String,

    #[serde(with = "humantime_duration")]
    pub openai_timeout: Duration,

    /// Never serialized in clear; see [`ApiCredential`].
    #[serde(
        serialize_with = "credential::serialize_redacted",
        deserialize_with = "credential::deserialize"
    )]
    pub openai_api_key: Option<ApiCredential>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "stub".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(150),
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_timeout: Duration::from_secs(120),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_timeout: Duration::from_secs(60),
            openai_api_key: None,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Decision webhook settings. No URL means no notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: Option<String>,

    #[serde(with = "humantime_duration")]
    pub timeout: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl RuntimeConfig {
    /// Defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Apply overrides from a variable lookup (the environment, in production).
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = get(LLM_PROVIDER_ENV) {
            self.llm.provider = provider;
        }
        if let Some(model) = get(LLM_MODEL_ENV) {
            self.llm.model = model;
        }
        if let Some(raw) = get(LLM_TIMEOUT_ENV) {
            self.llm.timeout = humantime_duration::parse(&raw).map_err(|_| {
                ConfigError::InvalidDuration {
                    var: LLM_TIMEOUT_ENV.to_string(),
                    value: raw.clone(),
                }
            })?;
        }
        if let Some(key) = get(OPENAI_API_KEY_ENV) {
            self.llm.openai_api_key = Some(ApiCredential::new(
                key,
                CredentialSource::Environment,
                "OpenAI API key",
            ));
        }
        if let Some(url) = get(OPENAI_BASE_URL_ENV) {
            self.llm.openai_base_url = url;
        }
        if let Some(url) = get(OLLAMA_BASE_URL_ENV) {
            self.llm.ollama_base_url = url;
        }
        if let Some(url) = get(WEBHOOK_URL_ENV) {
            self.webhook.url = Some(url);
        }
        if let Some(host) = get(API_HOST_ENV) {
            self.server.host = host;
        }
        if let Some(raw) = get(API_PORT_ENV) {
            self.server.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?;
        }

        Ok(())
    }

    /// Normalized provider name used for registry lookups.
    pub fn provider_name(&self) -> String {
        self.llm.provider.trim().to_lowercase()
    }

    pub fn has_api_key(&self) -> bool {
        self.llm
            .openai_api_key
            .as_ref()
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }

    /// Provider-specific JSON settings handed to a [`ProviderFactory`].
    ///
    /// [`ProviderFactory`]: crate::providers::ProviderFactory
    pub fn provider_settings(&self) -> serde_json::Value {
        match self.provider_name().as_str() {
            "ollama" => serde_json::json!({
                "base_url": self.llm.ollama_base_url,
                "timeout_secs": self.llm.ollama_timeout.as_secs(),
            }),
            "openai" => {
                let mut settings = serde_json::json!({
                    "base_url": self.llm.openai_base_url,
                    "timeout_secs": self.llm.openai_timeout.as_secs(),
                });
                if let Some(key) = &self.llm.openai_api_key {
                    settings["api_key"] = serde_json::Value::String(key.expose().to_string());
                }
                settings
            }
            _ => serde_json::json!({}),
        }
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// A bare integer is seconds; anything else goes through humantime.
    pub fn parse(raw: &str) -> Result<Duration, humantime::DurationError> {
        let raw = raw.trim();
        match raw.parse::<u64>() {
            Ok(secs) => Ok(Duration::from_secs(secs)),
            Err(_) => humantime::parse_duration(raw),
        }
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

mod credential {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::providers::secrets::{ApiCredential, CredentialSource};

    pub fn serialize_redacted<S>(value: &Option<ApiCredential>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(_) => serializer.serialize_str("[REDACTED]"),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ApiCredential>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .filter(|v| !v.is_empty())
            .map(|v| ApiCredential::new(v, CredentialSource::Config, "OpenAI API key")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.llm.provider, "stub");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.webhook.timeout, Duration::from_secs(10));
        assert_eq!(config.llm.ollama_timeout, Duration::from_secs(120));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = r#"
llm:
  provider: ollama
  model: llama3.1
  timeout: 2m
server:
  port: 9000
webhook:
  url: http://n8n.local/webhook/decisions
  timeout: 5s
"#;
        let config = RuntimeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.provider_name(), "ollama");
        assert_eq!(config.llm.model, "llama3.1");
        assert_eq!(config.llm.timeout, Duration::from_secs(120));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.webhook.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_yaml_rejects_bad_duration() {
        let yaml = "llm:\n  timeout: soon\n";
        assert!(matches!(RuntimeConfig::from_yaml(yaml), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = RuntimeConfig::from_yaml("llm:\n  provider: ollama\n").unwrap();
        config
            .apply_env(env(&[
                (LLM_PROVIDER_ENV, "OpenAI"),
                (OPENAI_API_KEY_ENV, "sk-test"),
                (API_PORT_ENV, "8080"),
                (WEBHOOK_URL_ENV, "http://hook"),
                (LLM_MODEL_ENV, ""),
            ]))
            .unwrap();

        assert_eq!(config.provider_name(), "openai");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.webhook.url.as_deref(), Some("http://hook"));
        assert!(config.has_api_key());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = RuntimeConfig::default();
        let result = config.apply_env(env(&[(API_PORT_ENV, "eighty")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn test_invalid_timeout_env() {
        let mut config = RuntimeConfig::default();
        let result = config.apply_env(env(&[(LLM_TIMEOUT_ENV, "forever")]));
        assert!(matches!(result, Err(ConfigError::InvalidDuration { .. })));
    }

    #[test]
    fn test_timeout_env_bare_seconds() {
        let mut config = RuntimeConfig::default();
        config.apply_env(env(&[(LLM_TIMEOUT_ENV, "90")])).unwrap();
        assert_eq!(config.llm.timeout, Duration::from_secs(90));

        config.apply_env(env(&[(LLM_TIMEOUT_ENV, "2m")])).unwrap();
        assert_eq!(config.llm.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_api_key_redacted_when_serialized() {
        let yaml = "llm:\n  provider: openai\n  openai_api_key: sk-very-secret\n";
        let config = RuntimeConfig::from_yaml(yaml).unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-very-secret"));
        assert!(json.contains("[REDACTED]"));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_provider_settings() {
        let mut config = RuntimeConfig::default();
        config.llm.provider = "openai".to_string();
        config.llm.openai_api_key = Some(ApiCredential::new(
            "sk-test",
            CredentialSource::Config,
            "OpenAI API key",
        ));

        let settings = config.provider_settings();
        assert_eq!(settings["api_key"], "sk-test");
        assert_eq!(settings["timeout_secs"], 60);

        config.llm.provider = " Ollama ".to_string();
        let settings = config.provider_settings();
        assert_eq!(settings["base_url"], "http://localhost:11434");
        assert!(settings.get("api_key").is_none());
    }
}
