//! Chat session state: transcript and session lifecycle.

pub mod session;
pub mod transcript;
