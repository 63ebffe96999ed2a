//! Secret resolution: trait, object-safe wrapper, and chain service.
//!
//! The single external credential (the provider API key) is resolved
//! through a chain of sources in priority order: environment variables,
//! then the OS keychain, then an interactive prompt. Concrete sources
//! live in `datapapo-infra`; this module defines the seam.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use datapapo_types::error::SecretError;
use datapapo_types::secret::SecretProvider;

/// Trait for secret storage backends (environment, keychain, prompt).
///
/// Each source stores and retrieves secret values. The [`SecretService`]
/// chains multiple sources in priority order.
pub trait SecretSource: Send + Sync {
    /// Which backend this source represents.
    fn provider(&self) -> SecretProvider;

    /// Retrieve a secret value by key.
    /// Returns None if the secret does not exist in this source.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, SecretError>> + Send;

    /// Store a secret value. Read-only sources return an error.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), SecretError>> + Send;

    /// Delete a secret. Read-only sources return an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), SecretError>> + Send;
}

/// Object-safe version of [`SecretSource`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch; a blanket implementation is
/// provided for all types implementing `SecretSource`.
pub trait SecretSourceDyn: Send + Sync {
    fn provider(&self) -> SecretProvider;

    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, SecretError>> + Send + 'a>>;

    fn set_boxed<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SecretError>> + Send + 'a>>;

    fn delete_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SecretError>> + Send + 'a>>;
}

impl<T: SecretSource> SecretSourceDyn for T {
    fn provider(&self) -> SecretProvider {
        SecretSource::provider(self)
    }

    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, SecretError>> + Send + 'a>> {
        Box::pin(self.get(key))
    }

    fn set_boxed<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SecretError>> + Send + 'a>> {
        Box::pin(self.set(key, value))
    }

    fn delete_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SecretError>> + Send + 'a>> {
        Box::pin(self.delete(key))
    }
}

/// Shared handle to a type-erased secret source.
pub type DynSecretSource = Arc<dyn SecretSourceDyn>;

/// A resolved secret: the value plus which backend produced it.
pub struct ResolvedSecret {
    pub value: String,
    pub provider: SecretProvider,
}

/// Service resolving secrets through a chain of sources in priority order.
///
/// Sources are ordered by precedence (first match wins).
pub struct SecretService {
    sources: Vec<DynSecretSource>,
}

impl SecretService {
    /// Create a new SecretService with the given source chain.
    ///
    /// Sources should be ordered by precedence (highest priority first).
    pub fn new(sources: Vec<DynSecretSource>) -> Self {
        Self { sources }
    }

    /// Resolve a secret value, first match wins.
    pub async fn resolve(&self, key: &str) -> Result<Option<ResolvedSecret>, SecretError> {
        for source in &self.sources {
            if let Some(value) = source.get_boxed(key).await? {
                return Ok(Some(ResolvedSecret {
                    value,
                    provider: source.provider(),
                }));
            }
        }
        Ok(None)
    }

    /// Store a secret value in the first writable source.
    ///
    /// Read-only sources (e.g., env vars) return an error, which is skipped.
    pub async fn store(&self, key: &str, value: &str) -> Result<SecretProvider, SecretError> {
        for source in &self.sources {
            if source.set_boxed(key, value).await.is_ok() {
                return Ok(source.provider());
            }
        }
        Err(SecretError::ProviderUnavailable(
            "no writable secret source available".to_string(),
        ))
    }

    /// Delete a secret from all sources that have it.
    pub async fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut deleted = false;
        for source in &self.sources {
            if source.delete_boxed(key).await.is_ok() {
                deleted = true;
            }
        }
        if !deleted {
            return Err(SecretError::NotFound(key.to_string()));
        }
        Ok(())
    }
}
