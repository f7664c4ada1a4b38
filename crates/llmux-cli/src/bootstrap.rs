//! Composition root.
//!
//! Loads the provider file, picks the transcript store and assembles the
//! proxy state. Handlers receive the finished pieces.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use llmux_core::load_providers;
use llmux_proxy::ProxyState;
use llmux_store::JsonFileTranscriptStore;

use crate::commands::ServeArgs;

/// Everything `serve` needs, resolved from arguments and environment.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub providers_path: PathBuf,
    pub logs_dir: PathBuf,
    pub models_timeout: Duration,
}

impl From<ServeArgs> for ServeConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            providers_path: args.providers,
            logs_dir: args.logs_dir,
            models_timeout: Duration::from_secs(args.models_timeout_secs),
        }
    }
}

/// Load `.env` from the working directory, if present.
pub fn load_env() {
    dotenvy::dotenv().ok();
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the proxy state for `config`.
pub fn build_state(config: &ServeConfig) -> Result<ProxyState> {
    let registry = load_providers(&config.providers_path)?;
    if registry.is_empty() {
        tracing::warn!(
            path = %config.providers_path.display(),
            "No providers configured"
        );
    }

    let store = JsonFileTranscriptStore::new(&config.logs_dir);
    let state = ProxyState::new(Arc::new(registry), Arc::new(store))
        .context("Failed to build HTTP client")?
        .with_models_timeout(config.models_timeout);
    Ok(state)
}
