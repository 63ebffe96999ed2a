//! Global configuration types for Datapapo.
//!
//! `GlobalConfig` represents the top-level `config.toml` that selects the
//! hosted-model backend and the HTTP bind address. All fields default so a
//! missing or partial file still yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

/// Top-level configuration for Datapapo.
///
/// Loaded from `~/.datapapo/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Which hosted-model backend answers analysis questions.
    #[serde(default = "default_provider")]
    pub provider: ProviderType,

    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature. Analysis answers should be deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Name of the secret holding the provider API key.
    #[serde(default = "default_api_key_secret")]
    pub api_key_secret: String,

    /// Base URL override for OpenAI-compatible backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// HTTP server bind address for `papo serve`.
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_provider() -> ProviderType {
    ProviderType::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f64 {
    0.0
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_api_key_secret() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key_secret: default_api_key_secret(),
            base_url: None,
            http: HttpConfig::default(),
        }
    }
}

/// HTTP server settings for `papo serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional directory of static browser UI assets to serve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_dir: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.provider, ProviderType::Gemini);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.temperature.abs() < f64::EPSILON);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.api_key_secret, "GEMINI_API_KEY");
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.provider, ProviderType::Gemini);
        assert_eq!(config.http.host, "127.0.0.1");
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
provider = "openai_compatible"
model = "gpt-4o-mini"
temperature = 0.3
api_key_secret = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"

[http]
host = "0.0.0.0"
port = 8080
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider, ProviderType::OpenAiCompatible);
        assert_eq!(config.model, "gpt-4o-mini");
        assert!((config.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.api_key_secret, "OPENAI_API_KEY");
        assert_eq!(config.base_url.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_global_config_serde_roundtrip() {
        let config = GlobalConfig {
            model: "gemini-2.5-pro".to_string(),
            ..GlobalConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GlobalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, "gemini-2.5-pro");
        assert_eq!(parsed.provider, ProviderType::Gemini);
    }
}
