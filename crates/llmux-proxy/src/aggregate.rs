//! Model listing aggregation across providers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use reqwest::{Client, header};
use serde_json::Value;
use tracing::{debug, warn};

use llmux_core::{ProviderConfig, ProviderRegistry};

use crate::models::{ListingOutcome, ModelsOverview, PrefixedModels, ProviderListing};

/// Per-provider timeout for model listing fetches.
pub const DEFAULT_MODELS_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches `GET {base}/v1/models` from every provider concurrently.
#[derive(Clone)]
pub struct ModelAggregator {
    client: Client,
    registry: Arc<ProviderRegistry>,
    timeout: Duration,
}

impl ModelAggregator {
    pub fn new(client: Client, registry: Arc<ProviderRegistry>, timeout: Duration) -> Self {
        Self {
            client,
            registry,
            timeout,
        }
    }

    /// One entry per provider, in configuration order. Failures are reported
    /// per provider and never fail the whole listing.
    pub async fn list_all(&self) -> ModelsOverview {
        let providers = join_all(self.registry.iter().map(|p| self.fetch(p))).await;
        ModelsOverview {
            timestamp: Utc::now(),
            providers,
        }
    }

    /// Every successful provider's models with provider-prefixed ids.
    pub async fn list_all_prefixed(&self) -> PrefixedModels {
        let overview = self.list_all().await;
        let mut data = Vec::new();
        for listing in overview.providers {
            match listing.outcome {
                ListingOutcome::Success { data: body } => {
                    data.extend(prefix_models(&listing.provider, &body));
                }
                ListingOutcome::Error { error, .. } => {
                    warn!(provider = %listing.provider, error = %error, "Skipping provider models");
                }
            }
        }
        PrefixedModels::new(data)
    }

    async fn fetch(&self, provider: &ProviderConfig) -> ProviderListing {
        let url = provider.upstream_url("v1/models", None);
        let mut request = self.client.get(&url).timeout(self.timeout);
        if let Some(bearer) = provider.bearer() {
            request = request.header(header::AUTHORIZATION, bearer);
        }

        let result = async {
            request
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await
        }
        .await;

        let outcome = match result {
            Ok(data) => {
                debug!(provider = %provider.name, "Fetched models");
                ListingOutcome::Success { data }
            }
            Err(e) => {
                warn!(provider = %provider.name, url = %url, error = %e, "Failed to fetch models");
                ListingOutcome::Error {
                    error: e.to_string(),
                    status_code: e.status().map(|s| s.as_u16()),
                }
            }
        };

        ProviderListing {
            provider: provider.name.clone(),
            outcome,
        }
    }
}

/// Rewrite a provider's `{"data": [...]}` listing for the auto namespace.
///
/// Each model gets `id = "<provider>/<id>"` and a `provider` field, and its
/// `display_name` (or else `name`) is suffixed with ` (<provider>)`. Entries
/// without a string id are dropped.
pub fn prefix_models(provider: &str, body: &Value) -> Vec<Value> {
    let Some(models) = body.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    models
        .iter()
        .filter_map(|model| {
            let id = model.get("id")?.as_str()?;
            let mut model = model.as_object()?.clone();
            model.insert("id".into(), Value::String(format!("{provider}/{id}")));
            model.insert("provider".into(), Value::String(provider.to_string()));

            let label_key = ["display_name", "name"]
                .into_iter()
                .find(|key| model.get(*key).and_then(Value::as_str).is_some_and(|s| !s.is_empty()));
            if let Some(key) = label_key
                && let Some(label) = model.get(key).and_then(Value::as_str)
            {
                let labelled = format!("{label} ({provider})");
                model.insert(key.into(), Value::String(labelled));
            }
            Some(Value::Object(model))
        })
        .collect()
}
