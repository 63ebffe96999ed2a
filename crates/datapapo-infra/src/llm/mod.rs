//! Hosted-model provider implementations.
//!
//! - `gemini`: native Google Generative Language API client (primary)
//! - `openai_compat`: one provider for any OpenAI-compatible backend

pub mod gemini;
pub mod openai_compat;
