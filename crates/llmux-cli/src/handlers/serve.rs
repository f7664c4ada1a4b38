//! `llmux serve`.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bootstrap::{ServeConfig, build_state};

/// Run the gateway until Ctrl-C.
pub async fn execute(config: ServeConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
        }
        shutdown.cancel();
    });

    run(config, cancel).await
}

/// Bind and serve until `cancel` fires.
pub async fn run(config: ServeConfig, cancel: CancellationToken) -> Result<()> {
    let state = build_state(&config)?;
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!(logs_dir = %config.logs_dir.display(), "Session transcripts enabled");
    llmux_proxy::serve(listener, state, cancel).await
}
