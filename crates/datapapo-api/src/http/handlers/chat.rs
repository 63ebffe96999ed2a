//! SSE streaming chat endpoint.
//!
//! POST /api/v1/chat/stream
//!
//! Streams agent responses as Server-Sent Events (SSE), mirroring the CLI
//! loop: snapshot the agent context, stream the completion, then update
//! the session transcript after completion.
//!
//! SSE event types:
//! - `session` -- initial event with `{ "session_id": "..." }`
//! - `text_delta` -- incremental text: `{ "text": "..." }`
//! - `chart` -- extracted chart spec (at most one, after the text)
//! - `usage` -- token usage: `{ "input_tokens": N, "output_tokens": N }`
//! - `done` -- stream complete: `{}`
//! - `error` -- error occurred: `{ "message": "..." }`

use std::convert::Infallible;
use std::time::Instant;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use datapapo_core::agent::engine::AgentEngine;
use datapapo_core::agent::figure::extract_chart;
use datapapo_core::agent::title::generate_title;
use datapapo_types::chat::ChatTurn;
use datapapo_types::error::DatasetError;
use datapapo_types::llm::StreamEvent;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the streaming chat endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamChatRequest {
    /// The user message to send to the agent.
    pub message: String,
}

/// POST /api/v1/chat/stream -- SSE streaming chat.
pub async fn stream_chat(
    State(state): State<AppState>,
    Json(body): Json<StreamChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let message = body.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }

    // Snapshot the context and record the user turn.
    let (context_snapshot, session_id, model) = {
        let mut guard = state.session.write().await;
        let session = guard
            .as_mut()
            .ok_or(AppError::Dataset(DatasetError::NotLoaded))?;

        let snapshot = session.context.clone();
        let session_id = session.manager.session().id;
        session.context.add_user_message(message.clone());
        session
            .transcript
            .push(ChatTurn::user(session_id, message.clone()));

        (snapshot, session_id, session.context.agent_config.model.clone())
    };

    let api_key = state
        .resolve_api_key()
        .await
        .map_err(|e| AppError::Secret(e.to_string()))?;
    let engine = AgentEngine::new(state.create_provider(api_key.value.clone(), &model));

    let event_stream = async_stream::stream! {
        yield sse_event("session", json!({ "session_id": session_id.to_string() }));

        let start_time = Instant::now();
        let mut llm_stream = engine.execute(&context_snapshot, &message);

        let mut full_response = String::new();
        let mut input_tokens: u32 = 0;
        let mut output_tokens: u32 = 0;

        while let Some(event_result) = llm_stream.next().await {
            match event_result {
                Ok(StreamEvent::TextDelta { text }) => {
                    full_response.push_str(&text);
                    yield sse_event("text_delta", json!({ "text": text }));
                }
                Ok(StreamEvent::Usage(usage)) => {
                    input_tokens = usage.input_tokens;
                    output_tokens = usage.output_tokens;
                }
                Ok(StreamEvent::Done) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "LLM stream failed");
                    yield sse_event("error", json!({ "message": e.to_string() }));

                    // Drop the failed exchange so a retry doesn't double it.
                    let mut guard = state.session.write().await;
                    if let Some(session) = guard.as_mut() {
                        if session.manager.session().id == session_id {
                            session.context.conversation_history.pop();
                        }
                    }
                    return;
                }
            }
        }

        let response_ms = start_time.elapsed().as_millis() as u64;
        let (_display_text, chart) = extract_chart(&full_response);

        if let Some(ref spec) = chart {
            yield sse_event("chart", serde_json::to_value(spec).unwrap_or(json!({})));
        }
        yield sse_event(
            "usage",
            json!({ "input_tokens": input_tokens, "output_tokens": output_tokens }),
        );

        // Apply the completed exchange to the session, unless it was
        // replaced by a new upload while we were streaming.
        let first_exchange = {
            let mut guard = state.session.write().await;
            match guard.as_mut() {
                Some(session) if session.manager.session().id == session_id => {
                    session.context.add_assistant_message(full_response.clone());
                    session.transcript.push(
                        ChatTurn::assistant(session_id, full_response.clone(), chart)
                            .with_metrics(input_tokens, output_tokens, response_ms),
                    );
                    session.manager.add_token_usage(input_tokens, output_tokens);
                    session.manager.increment_turn();
                    session.manager.turn_count() == 1
                }
                _ => {
                    info!("session replaced during streaming, discarding response");
                    false
                }
            }
        };

        if first_exchange {
            generate_session_title(&state, api_key.value, &model, &message, &full_response, session_id)
                .await;
        }

        yield sse_event("done", json!({}));
    };

    Ok(Sse::new(event_stream).keep_alive(KeepAlive::default()))
}

/// Build an SSE event with a JSON payload.
fn sse_event(name: &str, payload: serde_json::Value) -> Result<Event, Infallible> {
    Ok(Event::default().event(name).data(payload.to_string()))
}

/// Generate and store the session title after the first exchange.
async fn generate_session_title(
    state: &AppState,
    api_key: secrecy::SecretString,
    model: &str,
    user_message: &str,
    assistant_message: &str,
    session_id: uuid::Uuid,
) {
    let provider = state.create_provider(api_key, model);
    match generate_title(&provider, user_message, assistant_message, model).await {
        Ok(title) => {
            let mut guard = state.session.write().await;
            if let Some(session) = guard.as_mut() {
                if session.manager.session().id == session_id {
                    info!(title = %title, "session title generated");
                    session.manager.set_title(title);
                }
            }
        }
        Err(e) => warn!(error = %e, "failed to generate session title"),
    }
}
