//! HTTP request handlers.

pub mod chat;
pub mod dataset;
pub mod session;
