//! SSE stream adapter for `streamGenerateContent`.
//!
//! The Gemini streaming endpoint (with `alt=sse`) emits `data:` lines,
//! each carrying a JSON `GenerateContentResponse` chunk:
//! - intermediate chunks hold text deltas in `candidates[0].content.parts`
//! - the final chunk carries `finishReason` and `usageMetadata`
//! - the stream then simply ends (no terminator event)
//!
//! Events are mapped to the provider-agnostic [`StreamEvent`] enum.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use reqwest_eventsource::{Event, RequestBuilderExt};
use secrecy::{ExposeSecret, SecretString};

use datapapo_types::llm::{LlmError, StreamEvent, Usage};

use super::types::{map_finish_reason, GeminiRequest, GeminiResponse};

/// Create a streaming SSE connection to `streamGenerateContent`.
///
/// Returns a `Stream` of [`StreamEvent`]s:
/// 1. `Connected` -- once the SSE connection opens
/// 2. `TextDelta` -- for each text chunk
/// 3. `MessageDelta` -- when a chunk carries a finish reason
/// 4. `Usage` -- when a chunk carries usage metadata
/// 5. `Done` -- when the stream ends
pub fn create_gemini_stream(
    client: &reqwest::Client,
    url: &str,
    body: GeminiRequest,
    api_key: &SecretString,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    let request_builder = client
        .post(url)
        .header("x-goog-api-key", api_key.expose_secret())
        .header("content-type", "application/json")
        .json(&body);

    Box::pin(async_stream::try_stream! {
        let mut source = request_builder
            .eventsource()
            .map_err(|e| LlmError::Stream(format!("failed to open SSE connection: {e}")))?;

        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {
                    yield StreamEvent::Connected;
                }
                Ok(Event::Message(message)) => {
                    for mapped in map_chunk(&message.data)? {
                        yield mapped;
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    break;
                }
                Err(e) => {
                    source.close();
                    Err(LlmError::Stream(e.to_string()))?;
                }
            }
        }

        yield StreamEvent::Done;
    })
}

/// Map one SSE `data:` payload to stream events.
fn map_chunk(data: &str) -> Result<Vec<StreamEvent>, LlmError> {
    let chunk: GeminiResponse = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("failed to parse stream chunk: {e}")))?;

    let mut events = Vec::new();

    let text = chunk.text();
    if !text.is_empty() {
        events.push(StreamEvent::TextDelta { text });
    }

    if let Some(reason) = chunk.finish_reason() {
        events.push(StreamEvent::MessageDelta {
            stop_reason: map_finish_reason(Some(reason)),
        });
    }

    if let Some(usage) = &chunk.usage_metadata {
        events.push(StreamEvent::Usage(Usage {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        }));
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapapo_types::llm::StopReason;

    #[test]
    fn test_map_chunk_text_delta() {
        let data = r#"{"candidates": [{"content": {"parts": [{"text": "A média"}]}}]}"#;
        let events = map_chunk(data).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            StreamEvent::TextDelta { text } if text == "A média"
        ));
    }

    #[test]
    fn test_map_chunk_final() {
        let data = r#"{
            "candidates": [{"content": {"parts": [{"text": " é 30."}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20}
        }"#;
        let events = map_chunk(data).unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], StreamEvent::TextDelta { .. }));
        assert!(matches!(
            events[1],
            StreamEvent::MessageDelta {
                stop_reason: StopReason::EndTurn
            }
        ));
        assert!(matches!(
            &events[2],
            StreamEvent::Usage(u) if u.input_tokens == 12 && u.output_tokens == 8
        ));
    }

    #[test]
    fn test_map_chunk_empty_candidate() {
        let data = r#"{"candidates": [{"content": {}}]}"#;
        let events = map_chunk(data).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_map_chunk_invalid_json() {
        let err = map_chunk("not json").unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }
}
