//! Interactive prompt secret source.
//!
//! Last resort in the chain for interactive sessions: asks the user to
//! type the API key with hidden input. The value lives only for the
//! current process; the CLI separately offers to save it to the keychain.
//!
//! Never include this source in non-interactive contexts (the HTTP
//! server), or resolution would hang waiting for a terminal.

use datapapo_core::secret::SecretSource;
use datapapo_types::error::SecretError;
use datapapo_types::secret::SecretProvider;

/// Interactive prompt secret source (hidden terminal input).
pub struct PromptSecretSource;

impl PromptSecretSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PromptSecretSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSource for PromptSecretSource {
    fn provider(&self) -> SecretProvider {
        SecretProvider::Prompt
    }

    async fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        let prompt = format!("Chave '{key}' não encontrada. Digite o valor");
        // dialoguer is blocking; run it off the async runtime's worker.
        let value = tokio::task::spawn_blocking(move || {
            dialoguer::Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
        })
        .await
        .map_err(|e| SecretError::ProviderUnavailable(format!("prompt task failed: {e}")))?
        .map_err(|e| SecretError::ProviderUnavailable(format!("prompt unavailable: {e}")))?;

        if value.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(value.trim().to_string()))
        }
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), SecretError> {
        Err(SecretError::ProviderUnavailable(
            "prompt source cannot store values".to_string(),
        ))
    }

    async fn delete(&self, _key: &str) -> Result<(), SecretError> {
        Err(SecretError::ProviderUnavailable(
            "prompt source cannot delete values".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind() {
        let source = PromptSecretSource::new();
        assert_eq!(source.provider(), SecretProvider::Prompt);
    }

    #[tokio::test]
    async fn test_set_and_delete_are_unsupported() {
        let source = PromptSecretSource::new();
        assert!(source.set("KEY", "value").await.is_err());
        assert!(source.delete("KEY").await.is_err());
    }
}
