//! Typed table model and dataset profiling.
//!
//! A CSV is parsed (in datapapo-infra) into string records, then typed
//! here into a [`table::Table`] and summarized into a
//! [`datapapo_types::dataset::DatasetProfile`] for the analysis agent.

pub mod profile;
pub mod table;
