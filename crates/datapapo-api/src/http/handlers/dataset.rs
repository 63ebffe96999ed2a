//! Dataset upload and preview endpoints.
//!
//! POST /api/v1/datasets          -- upload CSV bytes, start a fresh session
//! GET  /api/v1/datasets/current  -- profile of the currently loaded dataset
//!
//! Uploading replaces the whole session: table, transcript, and agent
//! context are swapped together, so the "new file clears chat history"
//! invariant cannot be partially applied.

use axum::body::Bytes;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use datapapo_core::agent::context::{AgentConfig, AgentContext};
use datapapo_core::chat::session::SessionManager;
use datapapo_core::chat::transcript::Transcript;
use datapapo_core::dataset::profile::profile;
use datapapo_types::chat::ChatSession;
use datapapo_types::dataset::DatasetProfile;
use datapapo_types::error::DatasetError;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::{ActiveSession, AppState};

/// Query parameters for the upload endpoint.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Display name for the upload (defaults to "upload.csv").
    pub name: Option<String>,
}

/// Response payload for dataset endpoints.
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub session_id: String,
    pub profile: DatasetProfile,
    /// True when UTF-8 decoding failed and the latin1 fallback was used.
    pub used_encoding_fallback: bool,
}

/// POST /api/v1/datasets -- upload a CSV and start a fresh session.
pub async fn upload_dataset(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<ApiResponse<DatasetResponse>, AppError> {
    let source = params.name.unwrap_or_else(|| "upload.csv".to_string());

    let loaded = datapapo_infra::csv::load_bytes(&source, body.to_vec())?;
    let dataset_profile = profile(&loaded.table);

    let agent_config = AgentConfig {
        model: state.config.model.clone(),
        temperature: state.config.temperature,
        max_tokens: state.config.max_tokens,
    };

    let session = ChatSession::start(source.clone(), state.config.model.clone());
    let session_id = session.id;

    let active = ActiveSession {
        context: AgentContext::new(agent_config, dataset_profile.clone()),
        transcript: Transcript::new(),
        manager: SessionManager::new(session),
    };

    // Whole-object swap: the previous session (and its transcript) is dropped.
    *state.session.write().await = Some(active);

    info!(
        source = %source,
        rows = dataset_profile.row_count,
        columns = dataset_profile.column_count,
        "dataset uploaded, session replaced"
    );

    Ok(ApiResponse::success(DatasetResponse {
        session_id: session_id.to_string(),
        profile: dataset_profile,
        used_encoding_fallback: loaded.used_encoding_fallback,
    }))
}

/// GET /api/v1/datasets/current -- profile of the loaded dataset.
pub async fn current_dataset(
    State(state): State<AppState>,
) -> Result<ApiResponse<DatasetResponse>, AppError> {
    let guard = state.session.read().await;
    let session = guard
        .as_ref()
        .ok_or(AppError::Dataset(DatasetError::NotLoaded))?;

    Ok(ApiResponse::success(DatasetResponse {
        session_id: session.manager.session().id.to_string(),
        profile: session.context.profile.clone(),
        used_encoding_fallback: false,
    }))
}
