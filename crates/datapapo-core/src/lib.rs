//! Business logic for Datapapo.
//!
//! This crate holds the typed table model and profiler, the analysis
//! agent (prompt assembly, execution, chart extraction), the chat
//! session/transcript state, and the `LlmProvider` trait that the
//! infrastructure layer implements. It depends only on `datapapo-types`
//! -- never on `datapapo-infra` or any HTTP/IO crate.

pub mod agent;
pub mod chat;
pub mod dataset;
pub mod llm;
pub mod secret;
