//! CLI command definitions and dispatch for the `papo` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! verb-noun pattern (e.g., `papo chat data.csv`, `papo secret set KEY`).

pub mod chat;
pub mod dataset;
pub mod secret;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Converse with your CSV data through a hosted analysis agent.
#[derive(Parser)]
#[command(name = "papo", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a CSV file and chat with the analysis agent about it.
    Chat {
        /// Path to the CSV file to analyze.
        file: PathBuf,

        /// Override the configured model (e.g., "gemini-2.5-pro").
        #[arg(long)]
        model: Option<String>,
    },

    /// Load a CSV file and print its profile without starting a chat.
    Inspect {
        /// Path to the CSV file to profile.
        file: PathBuf,
    },

    /// Manage stored secrets (API keys).
    Secret {
        #[command(subcommand)]
        action: SecretCommand,
    },

    /// Start the HTTP API server for a browser front-end.
    Serve {
        /// Host to bind to.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SecretCommand {
    /// Store a secret in the OS keychain.
    Set {
        /// Secret name (e.g., "GEMINI_API_KEY").
        key: String,

        /// Secret value; prompted with hidden input when omitted.
        value: Option<String>,
    },

    /// Show where a secret resolves from (value masked).
    Show {
        /// Secret name to look up.
        key: String,
    },

    /// Delete a secret from the OS keychain.
    Delete {
        /// Secret name to delete.
        key: String,
    },
}
