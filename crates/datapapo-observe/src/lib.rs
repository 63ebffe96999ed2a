//! Observability for Datapapo: structured logging and optional
//! OpenTelemetry trace export.

pub mod genai_attrs;
pub mod tracing_setup;
