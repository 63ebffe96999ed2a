//! Secret chain builder -- wires concrete sources in priority order.
//!
//! This module lives in `datapapo-infra` because it assembles concrete
//! source implementations. The resulting chain is passed to
//! `SecretService` in `datapapo-core` via the `DynSecretSource`
//! abstraction.

use std::sync::Arc;

use datapapo_core::secret::DynSecretSource;

use super::env::EnvSecretSource;
use super::keychain::KeychainSecretSource;
use super::prompt::PromptSecretSource;

/// Build the default secret resolution chain.
///
/// The chain is ordered by precedence (first match wins):
/// 1. Environment variables
/// 2. OS keychain
/// 3. Interactive prompt (only when `interactive` is true -- never for
///    the HTTP server, which has no terminal to prompt on)
pub fn build_secret_chain(interactive: bool) -> Vec<DynSecretSource> {
    let mut chain: Vec<DynSecretSource> = vec![
        Arc::new(EnvSecretSource::new()),
        Arc::new(KeychainSecretSource::new()),
    ];

    if interactive {
        chain.push(Arc::new(PromptSecretSource::new()));
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapapo_types::secret::SecretProvider;

    #[test]
    fn test_interactive_chain_has_three_sources() {
        let chain = build_secret_chain(true);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].provider(), SecretProvider::Environment);
        assert_eq!(chain[1].provider(), SecretProvider::Keychain);
        assert_eq!(chain[2].provider(), SecretProvider::Prompt);
    }

    #[test]
    fn test_non_interactive_chain_skips_prompt() {
        let chain = build_secret_chain(false);
        assert_eq!(chain.len(), 2);
        assert!(chain.iter().all(|s| s.provider() != SecretProvider::Prompt));
    }
}
