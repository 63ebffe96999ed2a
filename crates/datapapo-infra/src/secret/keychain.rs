//! OS keychain secret source.
//!
//! Uses the `keyring` crate to store/retrieve secrets via:
//! - macOS Keychain
//! - Linux Secret Service (GNOME Keyring, KDE Wallet)
//! - Windows Credential Manager

use datapapo_core::secret::SecretSource;
use datapapo_types::error::SecretError;
use datapapo_types::secret::SecretProvider;

/// OS keychain secret source using the `keyring` crate.
pub struct KeychainSecretSource {
    service_name: String,
}

impl KeychainSecretSource {
    /// Create a new keychain source with the default service name "datapapo".
    pub fn new() -> Self {
        Self {
            service_name: "datapapo".to_string(),
        }
    }

    /// Create a keychain source with a custom service name (useful for testing).
    pub fn with_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Create a keyring::Entry for the given key.
    fn entry(&self, key: &str) -> Result<keyring::Entry, SecretError> {
        keyring::Entry::new(&self.service_name, key)
            .map_err(|e| SecretError::StorageError(format!("keychain entry error: {e}")))
    }
}

impl Default for KeychainSecretSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSource for KeychainSecretSource {
    fn provider(&self) -> SecretProvider {
        SecretProvider::Keychain
    }

    async fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        let entry = self.entry(key)?;

        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SecretError::StorageError(format!(
                "keychain get error: {e}"
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let entry = self.entry(key)?;

        entry
            .set_password(value)
            .map_err(|e| SecretError::StorageError(format!("keychain set error: {e}")))
    }

    async fn delete(&self, key: &str) -> Result<(), SecretError> {
        let entry = self.entry(key)?;

        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Err(SecretError::NotFound(key.to_string())),
            Err(e) => Err(SecretError::StorageError(format!(
                "keychain delete error: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_name() {
        let source = KeychainSecretSource::new();
        assert_eq!(source.service_name, "datapapo");
    }

    #[test]
    fn test_custom_service_name() {
        let source = KeychainSecretSource::with_service("datapapo-test");
        assert_eq!(source.service_name, "datapapo-test");
    }

    #[test]
    fn test_provider_kind() {
        let source = KeychainSecretSource::new();
        assert_eq!(source.provider(), SecretProvider::Keychain);
    }
}
