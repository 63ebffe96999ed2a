//! Session transcript endpoints.
//!
//! GET    /api/v1/sessions/current/messages -- the chat transcript
//! DELETE /api/v1/sessions/current          -- clear transcript, keep dataset

use axum::extract::State;
use serde::Serialize;

use datapapo_types::chat::ChatTurn;
use datapapo_types::error::SessionError;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Response payload for the transcript endpoint.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub session_id: String,
    pub title: Option<String>,
    pub turns: Vec<ChatTurn>,
}

/// GET /api/v1/sessions/current/messages -- the full transcript.
pub async fn get_messages(
    State(state): State<AppState>,
) -> Result<ApiResponse<MessagesResponse>, AppError> {
    let guard = state.session.read().await;
    let session = guard.as_ref().ok_or(SessionError::NoActiveSession)?;

    Ok(ApiResponse::success(MessagesResponse {
        session_id: session.manager.session().id.to_string(),
        title: session.manager.session().title.clone(),
        turns: session.transcript.turns().to_vec(),
    }))
}

/// DELETE /api/v1/sessions/current -- clear the transcript, keep the dataset.
pub async fn clear_session(
    State(state): State<AppState>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let mut guard = state.session.write().await;
    let session = guard.as_mut().ok_or(SessionError::NoActiveSession)?;

    session.transcript.clear();
    session.context.conversation_history.clear();

    Ok(ApiResponse::success(serde_json::json!({ "cleared": true })))
}
