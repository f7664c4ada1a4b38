//! Subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the gateway
    Serve(ServeArgs),

    /// Show configured providers
    Providers {
        /// Provider file (JSON object keyed by provider name)
        #[arg(long, env = "LLMUX_PROVIDERS", default_value = "providers.json")]
        providers: PathBuf,
    },
}

/// Arguments for `llmux serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Provider file (JSON object keyed by provider name)
    #[arg(long, env = "LLMUX_PROVIDERS", default_value = "providers.json")]
    pub providers: PathBuf,

    /// Directory session transcripts are written to
    #[arg(long, env = "LLMUX_LOGS_DIR", default_value = "logs")]
    pub logs_dir: PathBuf,

    /// Per-provider timeout for model listing requests, in seconds
    #[arg(long, default_value = "10")]
    pub models_timeout_secs: u64,
}
