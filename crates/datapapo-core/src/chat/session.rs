//! Session manager for chat sessions.
//!
//! Wraps a `ChatSession` with turn tracking and lifecycle management.
//! Sessions are in-memory only: they last exactly as long as the
//! interactive session that created them.

use chrono::Utc;

use datapapo_types::chat::{ChatSession, SessionStatus};

/// Manages the lifecycle and state of a single chat session.
pub struct SessionManager {
    session: ChatSession,
}

impl SessionManager {
    /// Create a new session manager wrapping an existing session.
    pub fn new(session: ChatSession) -> Self {
        Self { session }
    }

    /// Access the underlying chat session.
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Current turn count within this session.
    pub fn turn_count(&self) -> u32 {
        self.session.turn_count
    }

    /// Increment the turn counter.
    ///
    /// A "turn" is one user message + one assistant response.
    /// Call this after each complete exchange.
    pub fn increment_turn(&mut self) {
        self.session.turn_count += 1;
    }

    /// Set the auto-generated session title.
    pub fn set_title(&mut self, title: String) {
        self.session.title = Some(title);
    }

    /// Mark the session as completed.
    ///
    /// Sets status to `Completed` and records the end timestamp.
    pub fn mark_completed(&mut self) {
        self.session.status = SessionStatus::Completed;
        self.session.ended_at = Some(Utc::now());
    }

    /// Update token usage on the session after an LLM response.
    pub fn add_token_usage(&mut self, input_tokens: u32, output_tokens: u32) {
        self.session.total_input_tokens += input_tokens;
        self.session.total_output_tokens += output_tokens;
    }
}
