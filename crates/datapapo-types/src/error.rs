use thiserror::Error;

/// Errors related to dataset loading and profiling.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("empty input: no rows or header found")]
    Empty,

    #[error("read error: {0}")]
    Read(String),

    #[error("parse error at record {record}: {message}")]
    Parse { record: usize, message: String },

    #[error("no dataset loaded")]
    NotLoaded,
}

/// Errors related to secret resolution.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret '{0}' not found")]
    NotFound(String),

    #[error("secret provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session")]
    NoActiveSession,

    #[error("session already completed")]
    AlreadyCompleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_error_display() {
        let err = DatasetError::Parse {
            record: 7,
            message: "unequal lengths".to_string(),
        };
        assert_eq!(err.to_string(), "parse error at record 7: unequal lengths");
    }

    #[test]
    fn test_secret_error_display() {
        let err = SecretError::NotFound("GEMINI_API_KEY".to_string());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_session_error_display() {
        assert_eq!(SessionError::NoActiveSession.to_string(), "no active session");
    }
}
