//! Agent execution engine.
//!
//! AgentEngine coordinates the LLM call: assembles the CompletionRequest
//! from AgentContext, sends it through BoxLlmProvider, and returns
//! streaming events or full responses. OTel GenAI spans instrument every
//! LLM call.

use std::pin::Pin;

use futures_util::Stream;
use tracing::{Instrument, info_span};

use datapapo_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, StreamEvent,
};

use crate::llm::box_provider::BoxLlmProvider;

use super::context::AgentContext;

/// The assistant greeting used when greeting generation fails.
pub const FALLBACK_GREETING: &str =
    "Olá! O que posso fazer por você hoje? Quais dúvidas você tem sobre o arquivo?";

/// Executes LLM calls on behalf of the analysis agent.
///
/// Holds a `BoxLlmProvider` for runtime provider dispatch and builds
/// `CompletionRequest`s from `AgentContext` state.
pub struct AgentEngine {
    provider: BoxLlmProvider,
}

impl AgentEngine {
    /// Create a new agent engine with the given LLM provider.
    pub fn new(provider: BoxLlmProvider) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Execute a streaming LLM call for a user message.
    ///
    /// Builds a `CompletionRequest` from the agent context (system prompt +
    /// conversation history + user message) and streams events back.
    ///
    /// The caller is responsible for updating
    /// `AgentContext.conversation_history` with the user message before
    /// calling and the assistant response after.
    pub fn execute(
        &self,
        context: &AgentContext,
        user_message: &str,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let request = self.build_request(context, user_message);

        let span = info_span!(
            "gen_ai.execute",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.stream = true,
        );

        let stream = self.provider.stream(request);

        Box::pin(StreamInSpan { inner: stream, span })
    }

    /// Execute a non-streaming LLM call and return the full response.
    ///
    /// Used where streaming is not needed (HTTP one-shot calls, title
    /// generation).
    pub async fn execute_non_streaming(
        &self,
        context: &AgentContext,
        user_message: &str,
    ) -> Result<CompletionResponse, LlmError> {
        let request = self.build_request(context, user_message);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.stream = false,
        );

        self.provider.complete(&request).instrument(span).await
    }

    /// Generate the opening assistant greeting for a freshly loaded dataset.
    ///
    /// Callers fall back to [`FALLBACK_GREETING`] on error.
    pub async fn generate_greeting(&self, context: &AgentContext) -> Result<String, LlmError> {
        let greeting_prompt = "Cumprimente o usuário em uma ou duas frases, em português, \
            mencionando o arquivo carregado e convidando-o a fazer perguntas sobre os dados. \
            Não inclua análises ainda.";

        let request = self.build_request(context, greeting_prompt);

        let span = info_span!(
            "gen_ai.greeting",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        Ok(response.content)
    }

    /// Build a CompletionRequest from the agent context and a user message.
    fn build_request(&self, context: &AgentContext, user_message: &str) -> CompletionRequest {
        let mut messages = context.build_messages();

        messages.push(Message {
            role: MessageRole::User,
            content: user_message.to_string(),
        });

        CompletionRequest {
            model: context.agent_config.model.clone(),
            messages,
            system: Some(context.system_prompt.clone()),
            max_tokens: context.agent_config.max_tokens,
            temperature: Some(context.agent_config.temperature),
            stream: true, // Default to streaming; overridden by complete()
            stop_sequences: None,
        }
    }
}

/// A stream wrapper that keeps an OTel span alive for the duration of
/// streaming.
///
/// Without this, the span would be dropped immediately after creating the
/// stream, losing the instrumentation for the actual streaming duration.
/// All fields are `Unpin`, so polling needs no unsafe projection.
struct StreamInSpan {
    inner: Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>,
    span: tracing::Span,
}

impl Stream for StreamInSpan {
    type Item = Result<StreamEvent, LlmError>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let _enter = this.span.enter();
        this.inner.as_mut().poll_next(cx)
    }
}
