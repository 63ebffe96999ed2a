//! Concrete secret sources and the default resolution chain.
//!
//! Default chain order: `[EnvSecretSource, KeychainSecretSource, PromptSecretSource]`

pub mod chain;
pub mod env;
pub mod keychain;
pub mod prompt;

pub use chain::build_secret_chain;
pub use env::EnvSecretSource;
pub use keychain::KeychainSecretSource;
pub use prompt::PromptSecretSource;
