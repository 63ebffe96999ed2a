//! Chat session and transcript types for Datapapo.
//!
//! These types model the conversation between the user and the analysis
//! agent: sessions, turns, and per-turn response metadata. A turn may
//! carry an optional chart produced alongside the assistant's text.
//!
//! Transcripts are session-scoped: they live in memory and are cleared
//! whenever a new dataset replaces the current one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::chart::ChartSpec;

// Re-export MessageRole from llm module (used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Lifecycle status of a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Active
    }
}

/// A chat session over one dataset.
///
/// Tracks lifetime, token usage, and turn count. The `dataset_source`
/// records which upload this session is about; replacing the dataset
/// creates a fresh session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    /// Source name of the dataset this session analyzes.
    pub dataset_source: String,
    pub title: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_input_tokens: u32,
    pub total_output_tokens: u32,
    pub turn_count: u32,
    pub model: String,
    pub status: SessionStatus,
}

impl ChatSession {
    /// Start a new active session for a dataset.
    pub fn start(dataset_source: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            dataset_source: dataset_source.into(),
            title: None,
            started_at: Utc::now(),
            ended_at: None,
            total_input_tokens: 0,
            total_output_tokens: 0,
            turn_count: 0,
            model: model.into(),
            status: SessionStatus::Active,
        }
    }
}

/// A single turn within a chat session.
///
/// Turns are ordered by `created_at`. Assistant turns include token usage
/// and response timing metadata, and may carry a chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// Chart emitted alongside the text (assistant turns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
    pub created_at: DateTime<Utc>,
    /// Input tokens consumed by this turn (assistant turns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    /// Output tokens generated for this turn (assistant turns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
    /// Response latency in milliseconds (assistant turns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_ms: Option<u64>,
}

impl ChatTurn {
    /// Build a user turn.
    pub fn user(session_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::User,
            content: content.into(),
            chart: None,
            created_at: Utc::now(),
            input_tokens: None,
            output_tokens: None,
            response_ms: None,
        }
    }

    /// Build an assistant turn with optional chart and response metadata.
    pub fn assistant(
        session_id: Uuid,
        content: impl Into<String>,
        chart: Option<ChartSpec>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::Assistant,
            content: content.into(),
            chart,
            created_at: Utc::now(),
            input_tokens: None,
            output_tokens: None,
            response_ms: None,
        }
    }

    /// Attach token usage and latency to an assistant turn.
    pub fn with_metrics(mut self, input_tokens: u32, output_tokens: u32, response_ms: u64) -> Self {
        self.input_tokens = Some(input_tokens);
        self.output_tokens = Some(output_tokens);
        self.response_ms = Some(response_ms);
        self
    }
}
