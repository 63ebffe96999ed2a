//! BoxLlmProvider -- object-safe dynamic dispatch wrapper for LlmProvider.
//!
//! 1. Define an object-safe `LlmProviderDyn` trait with boxed futures
//! 2. Blanket-impl `LlmProviderDyn` for all `T: LlmProvider`
//! 3. `BoxLlmProvider` wraps `Box<dyn LlmProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use futures_util::Stream;

use datapapo_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StreamEvent,
};

use super::provider::LlmProvider;

/// Object-safe version of [`LlmProvider`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn LlmProviderDyn`).
/// A blanket implementation is provided for all types implementing `LlmProvider`.
pub trait LlmProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &ProviderCapabilities;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

    fn stream_boxed(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;
}

/// Blanket implementation: any `LlmProvider` automatically implements `LlmProviderDyn`.
impl<T: LlmProvider> LlmProviderDyn for T {
    fn name(&self) -> &str {
        LlmProvider::name(self)
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        LlmProvider::capabilities(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }

    fn stream_boxed(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.stream(request)
    }
}

/// Type-erased LLM provider for runtime provider selection.
///
/// Wraps any `LlmProvider` implementation behind dynamic dispatch,
/// enabling runtime selection of providers (Gemini vs. an
/// OpenAI-compatible backend).
///
/// Since `LlmProvider` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxLlmProvider` provides equivalent methods that delegate to
/// the inner `LlmProviderDyn` trait object.
pub struct BoxLlmProvider {
    inner: Box<dyn LlmProviderDyn + Send + Sync>,
}

impl BoxLlmProvider {
    /// Wrap a concrete `LlmProvider` in a type-erased box.
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    /// Human-readable provider name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// What this provider supports.
    pub fn capabilities(&self) -> &ProviderCapabilities {
        self.inner.capabilities()
    }

    /// Send a completion request and receive the full response.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner.complete_boxed(request).await
    }

    /// Send a streaming completion request. Returns a stream of events.
    pub fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.inner.stream_boxed(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapapo_types::llm::{StopReason, Usage};

    /// A canned provider for exercising the dynamic dispatch path.
    struct FixedProvider {
        capabilities: ProviderCapabilities,
    }

    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                id: "resp_1".to_string(),
                content: format!("echo: {}", request.messages.len()),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }

        fn stream(
            &self,
            _request: CompletionRequest,
        ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
            Box::pin(futures_util::stream::iter(vec![
                Ok(StreamEvent::Connected),
                Ok(StreamEvent::TextDelta {
                    text: "oi".to_string(),
                }),
                Ok(StreamEvent::Done),
            ]))
        }
    }

    fn boxed() -> BoxLlmProvider {
        BoxLlmProvider::new(FixedProvider {
            capabilities: ProviderCapabilities {
                streaming: true,
                max_context_tokens: 1_000_000,
                max_output_tokens: 65_536,
            },
        })
    }

    #[test]
    fn test_name_and_capabilities_delegate() {
        let provider = boxed();
        assert_eq!(provider.name(), "fixed");
        assert!(provider.capabilities().streaming);
    }

    #[tokio::test]
    async fn test_complete_delegates() {
        let provider = boxed();
        let request = CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            messages: vec![],
            system: None,
            max_tokens: 128,
            temperature: None,
            stream: false,
            stop_sequences: None,
        };
        let response = provider.complete(&request).await.unwrap();
        assert_eq!(response.content, "echo: 0");
        assert_eq!(response.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_stream_delegates() {
        use futures_util::StreamExt;

        let provider = boxed();
        let request = CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            messages: vec![],
            system: None,
            max_tokens: 128,
            temperature: None,
            stream: true,
            stop_sequences: None,
        };
        let events: Vec<_> = provider.stream(request).collect().await;
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], Ok(StreamEvent::TextDelta { .. })));
    }
}
