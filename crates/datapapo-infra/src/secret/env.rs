//! Environment variable secret source.
//!
//! A read-only secret source that checks environment variables. This is
//! the highest-priority source in the resolution chain: env vars override
//! all other backends.

use datapapo_core::secret::SecretSource;
use datapapo_types::error::SecretError;
use datapapo_types::secret::SecretProvider;

/// Environment variable secret source.
///
/// Read-only: `set()` and `delete()` return `ProviderUnavailable`
/// because environment variables cannot be persistently modified.
pub struct EnvSecretSource;

impl EnvSecretSource {
    /// Create a new environment variable secret source.
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvSecretSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSource for EnvSecretSource {
    fn provider(&self) -> SecretProvider {
        SecretProvider::Environment
    }

    async fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        match std::env::var(key) {
            Ok(val) => Ok(Some(val)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                // Env var exists but has invalid Unicode -- treat as not found
                // rather than erroring, since secrets must be valid strings
                Ok(None)
            }
        }
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), SecretError> {
        // Environment variables are read-only in the context of secret storage.
        // Users set them via shell config, not through our API.
        Err(SecretError::ProviderUnavailable(
            "environment variable source is read-only".to_string(),
        ))
    }

    async fn delete(&self, _key: &str) -> Result<(), SecretError> {
        Err(SecretError::ProviderUnavailable(
            "environment variable source is read-only".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_env_source_get_existing() {
        // SAFETY: This test sets a uniquely named var and removes it after.
        unsafe { std::env::set_var("DATAPAPO_TEST_SECRET_1", "test-value-123") };

        let source = EnvSecretSource::new();
        let result = source.get("DATAPAPO_TEST_SECRET_1").await.unwrap();

        assert_eq!(result, Some("test-value-123".to_string()));

        // SAFETY: The var was just set above.
        unsafe { std::env::remove_var("DATAPAPO_TEST_SECRET_1") };
    }

    #[tokio::test]
    async fn test_env_source_get_missing() {
        let source = EnvSecretSource::new();
        let result = source.get("NONEXISTENT_VAR_XYZ_123").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_env_source_set_returns_error() {
        let source = EnvSecretSource::new();
        assert!(source.set("KEY", "value").await.is_err());
    }

    #[tokio::test]
    async fn test_env_source_delete_returns_error() {
        let source = EnvSecretSource::new();
        assert!(source.delete("KEY").await.is_err());
    }
}
