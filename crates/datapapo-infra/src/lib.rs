//! Infrastructure layer for Datapapo.
//!
//! Concrete implementations behind the abstractions in `datapapo-core`:
//! CSV ingestion with encoding fallback, hosted-model HTTP clients
//! (Gemini native, OpenAI-compatible), the secret resolution chain
//! (environment, OS keychain, interactive prompt), and config loading.

pub mod config;
pub mod csv;
pub mod llm;
pub mod secret;
