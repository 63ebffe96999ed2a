//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use datapapo_types::error::{DatasetError, SessionError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Dataset loading/profiling errors.
    Dataset(DatasetError),
    /// Session state errors.
    Session(SessionError),
    /// Secret resolution failed.
    Secret(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<DatasetError> for AppError {
    fn from(e: DatasetError) -> Self {
        AppError::Dataset(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Dataset(DatasetError::NotLoaded) => (
                StatusCode::NOT_FOUND,
                "DATASET_NOT_LOADED",
                "No dataset loaded; upload one first".to_string(),
            ),
            AppError::Dataset(DatasetError::Empty) => (
                StatusCode::BAD_REQUEST,
                "DATASET_EMPTY",
                "Uploaded file has no rows or header".to_string(),
            ),
            AppError::Dataset(e @ DatasetError::Parse { .. }) => {
                (StatusCode::BAD_REQUEST, "DATASET_PARSE_ERROR", e.to_string())
            }
            AppError::Dataset(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATASET_ERROR",
                e.to_string(),
            ),
            AppError::Session(SessionError::NoActiveSession) => (
                StatusCode::NOT_FOUND,
                "NO_ACTIVE_SESSION",
                "No active session".to_string(),
            ),
            AppError::Session(e) => (
                StatusCode::CONFLICT,
                "SESSION_ERROR",
                e.to_string(),
            ),
            AppError::Secret(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SECRET_ERROR",
                msg.clone(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_loaded_maps_to_404() {
        let response = AppError::Dataset(DatasetError::NotLoaded).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_empty_dataset_maps_to_400() {
        let response = AppError::Dataset(DatasetError::Empty).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("message is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
