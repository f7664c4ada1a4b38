//! Shared state handed to every handler.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use llmux_core::{ProviderRegistry, TranscriptStore};

use crate::aggregate::{DEFAULT_MODELS_TIMEOUT, ModelAggregator};

/// Application state for the gateway router.
///
/// Cheap to clone: the client is reference-counted internally and everything
/// else sits behind an `Arc`.
#[derive(Clone)]
pub struct ProxyState {
    /// HTTP client shared by forwarding and aggregation.
    pub client: Client,
    /// Configured providers, read-only after startup.
    pub registry: Arc<ProviderRegistry>,
    /// Destination for reconstructed session transcripts.
    pub store: Arc<dyn TranscriptStore>,
    /// Per-provider timeout for model listing fetches.
    pub models_timeout: Duration,
}

impl fmt::Debug for ProxyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyState")
            .field("providers", &self.registry.names())
            .field("models_timeout", &self.models_timeout)
            .finish_non_exhaustive()
    }
}

impl ProxyState {
    /// Build state with a fresh pooled client.
    pub fn new(
        registry: Arc<ProviderRegistry>,
        store: Arc<dyn TranscriptStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().pool_max_idle_per_host(10).build()?;
        Ok(Self {
            client,
            registry,
            store,
            models_timeout: DEFAULT_MODELS_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_models_timeout(mut self, timeout: Duration) -> Self {
        self.models_timeout = timeout;
        self
    }

    pub(crate) fn aggregator(&self) -> ModelAggregator {
        ModelAggregator::new(
            self.client.clone(),
            Arc::clone(&self.registry),
            self.models_timeout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmux_core::ProviderConfig;
    use llmux_store::InMemoryTranscriptStore;

    #[test]
    fn debug_lists_providers_without_tokens() {
        let registry = ProviderRegistry::new(vec![
            ProviderConfig::new("main", "http://main.test").with_auth_token("sk-secret"),
        ])
        .unwrap();
        let state = ProxyState::new(Arc::new(registry), Arc::new(InMemoryTranscriptStore::new()))
            .unwrap()
            .with_models_timeout(Duration::from_secs(3));

        let rendered = format!("{state:?}");
        assert!(rendered.contains("main"));
        assert!(rendered.contains("3s"));
        assert!(!rendered.contains("sk-secret"));
    }
}
