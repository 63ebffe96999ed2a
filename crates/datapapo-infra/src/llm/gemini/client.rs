//! GeminiProvider -- concrete [`LlmProvider`] implementation for the
//! Google Generative Language API.
//!
//! Sends requests to `models/{model}:generateContent` (non-streaming) and
//! `models/{model}:streamGenerateContent?alt=sse` (streaming) with the
//! `x-goog-api-key` header.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::pin::Pin;
use std::time::Duration;

use futures_util::Stream;
use secrecy::{ExposeSecret, SecretString};

use datapapo_core::llm::provider::LlmProvider;
use datapapo_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, ProviderCapabilities,
    StreamEvent, Usage,
};

use super::streaming::create_gemini_stream;
use super::types::{
    map_finish_reason, GeminiContent, GeminiErrorEnvelope, GeminiGenerationConfig, GeminiPart,
    GeminiRequest, GeminiResponse, GeminiSystemInstruction,
};

/// Google Gemini LLM provider.
///
/// Implements [`LlmProvider`] for the Generative Language API.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Google API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-2.5-flash")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // long analyses can take a while
            .build()
            .expect("failed to create reqwest client");

        let capabilities = Self::capabilities_for_model(&model);

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model,
            capabilities,
        }
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Determine capabilities based on model name.
    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        if model.contains("flash") || model.contains("pro") {
            ProviderCapabilities {
                streaming: true,
                max_context_tokens: 1_000_000,
                max_output_tokens: 65_536,
            }
        } else {
            // Conservative defaults for unknown models
            ProviderCapabilities {
                streaming: true,
                max_context_tokens: 128_000,
                max_output_tokens: 8_192,
            }
        }
    }

    /// Build the full API URL for a model method.
    fn url(&self, method: &str) -> String {
        format!("{}/models/{}:{method}", self.base_url, self.model)
    }

    /// Convert a generic [`CompletionRequest`] into a [`GeminiRequest`].
    ///
    /// The assistant role maps to "model" on the wire; system messages in
    /// the history are folded into user entries (the system prompt proper
    /// travels in `systemInstruction`).
    fn to_gemini_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| GeminiContent {
                role: Some(match m.role {
                    MessageRole::Assistant => "model".to_string(),
                    _ => "user".to_string(),
                }),
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction: request.system.as_ref().map(|s| GeminiSystemInstruction {
                parts: vec![GeminiPart { text: s.clone() }],
            }),
            generation_config: Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: Some(request.max_tokens),
                stop_sequences: request.stop_sequences.clone(),
            }),
        }
    }

    /// Map an HTTP error status + body to an [`LlmError`].
    fn map_status_error(status: reqwest::StatusCode, body: String) -> LlmError {
        let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationFailed,
            429 => LlmError::RateLimited {
                retry_after_ms: None,
            },
            503 => LlmError::Overloaded(message),
            400 => LlmError::InvalidRequest(message),
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

// GeminiProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_gemini_request(request);
        let url = self.url("generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::map_status_error(status, error_body));
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let usage = gemini_resp
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: gemini_resp.response_id.clone().unwrap_or_default(),
            content: gemini_resp.text(),
            model: gemini_resp
                .model_version
                .clone()
                .unwrap_or_else(|| self.model.clone()),
            stop_reason: map_finish_reason(gemini_resp.finish_reason()),
            usage,
        })
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let body = self.to_gemini_request(&request);
        let url = format!("{}?alt=sse", self.url("streamGenerateContent"));

        create_gemini_stream(&self.client, &url, body, &self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapapo_types::llm::Message;

    fn make_provider() -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key-not-real"),
            "gemini-2.5-flash".to_string(),
        )
    }

    #[test]
    fn test_provider_name() {
        let provider = make_provider();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_flash_capabilities() {
        let provider = make_provider();
        let caps = provider.capabilities();
        assert_eq!(caps.max_context_tokens, 1_000_000);
        assert_eq!(caps.max_output_tokens, 65_536);
        assert!(caps.streaming);
    }

    #[test]
    fn test_unknown_model_capabilities() {
        let provider = GeminiProvider::new(
            SecretString::from("test-key"),
            "gemini-nano".to_string(),
        );
        assert_eq!(provider.capabilities().max_context_tokens, 128_000);
    }

    #[test]
    fn test_url_building() {
        let provider = make_provider();
        assert_eq!(
            provider.url("generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_base_url_override() {
        let provider = make_provider().with_base_url("http://localhost:8080".to_string());
        assert_eq!(
            provider.url("generateContent"),
            "http://localhost:8080/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_to_gemini_request_maps_roles() {
        let provider = make_provider();
        let request = CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            messages: vec![
                Message {
                    role: MessageRole::User,
                    content: "Qual a média?".to_string(),
                },
                Message {
                    role: MessageRole::Assistant,
                    content: "A média é 30.".to_string(),
                },
            ],
            system: Some("Você é um analista.".to_string()),
            max_tokens: 2048,
            temperature: Some(0.0),
            stream: false,
            stop_sequences: None,
        };

        let gemini_req = provider.to_gemini_request(&request);
        assert_eq!(gemini_req.contents.len(), 2);
        assert_eq!(gemini_req.contents[0].role.as_deref(), Some("user"));
        assert_eq!(gemini_req.contents[1].role.as_deref(), Some("model"));
        assert!(gemini_req.system_instruction.is_some());
        let config = gemini_req.generation_config.as_ref().unwrap();
        assert_eq!(config.max_output_tokens, Some(2048));
    }

    #[test]
    fn test_map_status_error_auth() {
        let err = GeminiProvider::map_status_error(
            reqwest::StatusCode::FORBIDDEN,
            r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#.to_string(),
        );
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[test]
    fn test_map_status_error_rate_limit() {
        let err = GeminiProvider::map_status_error(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            String::new(),
        );
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[test]
    fn test_map_status_error_extracts_message() {
        let err = GeminiProvider::map_status_error(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": {"code": 500, "message": "backend error", "status": "INTERNAL"}}"#
                .to_string(),
        );
        match err {
            LlmError::Provider { message } => assert!(message.contains("backend error")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
