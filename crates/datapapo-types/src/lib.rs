//! Shared domain types for Datapapo.
//!
//! This crate contains the core domain types used across the Datapapo
//! application: dataset profiles, chat turns, chart specs, LLM
//! request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chart;
pub mod chat;
pub mod config;
pub mod dataset;
pub mod error;
pub mod llm;
pub mod secret;
