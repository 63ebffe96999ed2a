//! Application state wiring configuration, secrets, and the active session.
//!
//! AppState holds the pieces shared by the CLI and the HTTP API: the
//! loaded configuration, the secret resolution chain, and (for the HTTP
//! server) the single active analysis session behind a lock.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::RwLock;

use datapapo_core::agent::context::AgentContext;
use datapapo_core::chat::session::SessionManager;
use datapapo_core::chat::transcript::Transcript;
use datapapo_core::llm::box_provider::BoxLlmProvider;
use datapapo_core::secret::SecretService;
use datapapo_infra::config::{load_global_config, resolve_data_dir};
use datapapo_infra::llm::gemini::GeminiProvider;
use datapapo_infra::llm::openai_compat::OpenAiCompatibleProvider;
use datapapo_infra::secret::build_secret_chain;
use datapapo_types::config::GlobalConfig;
use datapapo_types::llm::ProviderType;

/// The active analysis session held by the HTTP server.
///
/// All three pieces are replaced together when a new dataset is uploaded;
/// this is the "replace table, clear history" invariant in one place.
pub struct ActiveSession {
    pub context: AgentContext,
    pub transcript: Transcript,
    pub manager: SessionManager,
}

/// Shared application state for CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub secret_service: Arc<SecretService>,
    /// The single current session (HTTP mode). None until a dataset is uploaded.
    pub session: Arc<RwLock<Option<ActiveSession>>>,
}

impl AppState {
    /// Initialize the application state: load config, wire the secret chain.
    ///
    /// `interactive` controls whether the secret chain may prompt on the
    /// terminal (CLI chat) or must stay non-interactive (HTTP server,
    /// inspect).
    pub async fn init(interactive: bool) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_global_config(&data_dir).await;
        let secret_service = SecretService::new(build_secret_chain(interactive));

        Ok(Self {
            config,
            data_dir,
            secret_service: Arc::new(secret_service),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Resolve the provider API key through the secret chain.
    pub async fn resolve_api_key(&self) -> anyhow::Result<ResolvedApiKey> {
        let key_name = &self.config.api_key_secret;
        let resolved = self
            .secret_service
            .resolve(key_name)
            .await?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "{key_name} not found. Set it with: papo secret set {key_name}, \
                     or export it as an environment variable"
                )
            })?;

        Ok(ResolvedApiKey {
            value: SecretString::from(resolved.value),
            provider: resolved.provider,
        })
    }

    /// Build the configured LLM provider with the given API key.
    pub fn create_provider(&self, api_key: SecretString, model: &str) -> BoxLlmProvider {
        use secrecy::ExposeSecret;

        match self.config.provider {
            ProviderType::Gemini => {
                BoxLlmProvider::new(GeminiProvider::new(api_key, model.to_string()))
            }
            ProviderType::OpenAiCompatible => match self.config.base_url.as_deref() {
                Some(base_url) => BoxLlmProvider::new(OpenAiCompatibleProvider::custom(
                    base_url,
                    api_key.expose_secret(),
                    model,
                )),
                None => BoxLlmProvider::new(OpenAiCompatibleProvider::openai(
                    api_key.expose_secret(),
                    model,
                )),
            },
        }
    }
}

/// An API key resolved through the secret chain, noting its origin.
pub struct ResolvedApiKey {
    pub value: SecretString,
    pub provider: datapapo_types::secret::SecretProvider,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(config: GlobalConfig) -> AppState {
        AppState {
            config,
            data_dir: PathBuf::from("/tmp"),
            secret_service: Arc::new(SecretService::new(vec![])),
            session: Arc::new(RwLock::new(None)),
        }
    }

    #[test]
    fn test_create_provider_gemini_default() {
        let state = test_state(GlobalConfig::default());
        let provider = state.create_provider(SecretString::from("k"), "gemini-2.5-flash");
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_create_provider_openai_compat() {
        let config = GlobalConfig {
            provider: ProviderType::OpenAiCompatible,
            ..GlobalConfig::default()
        };
        let state = test_state(config);
        let provider = state.create_provider(SecretString::from("k"), "gpt-4o-mini");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_provider_custom_base_url() {
        let config = GlobalConfig {
            provider: ProviderType::OpenAiCompatible,
            base_url: Some("http://localhost:8000/v1".to_string()),
            ..GlobalConfig::default()
        };
        let state = test_state(config);
        let provider = state.create_provider(SecretString::from("k"), "local");
        assert_eq!(provider.name(), "openai_compatible");
    }
}
